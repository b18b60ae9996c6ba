/// # Text processing
/// turning a free-form problem statement into canonical math text and deciding what kind of
/// problem it states
///# Example
/// ```
/// use RustedAlgebra::text_processing::normalizer::TextNormalizer;
/// use RustedAlgebra::text_processing::classifier::{ProblemClassifier, ProblemType};
/// let normalized = TextNormalizer::new().normalize("Solve for x: 2x + 5 = 13").unwrap();
/// assert_eq!(normalized.canonical, "2 * x + 5 = 13");
/// assert_eq!(normalized.target.as_deref(), Some("x"));
/// let classification = ProblemClassifier::new().classify(&normalized);
/// assert_eq!(classification.problem_type, ProblemType::Linear);
/// assert!(classification.confidence > 0.0);
/// ```
/// ___________________________________________________________________________________________
/// canonicalization of glyphs, prefixes, number words and operator phrases
pub mod normalizer;
/// trigger words per problem category, optionally extended from a TOML mapping
pub mod keywords;
/// fixed-order rule table deciding linear / quadratic / system
pub mod classifier;
/// the analysis record handed to presentation layers
pub mod analysis;
