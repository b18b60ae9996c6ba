// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod equations;
pub mod math_solver;
pub mod solver;
pub mod symbolic;
pub mod text_processing;
