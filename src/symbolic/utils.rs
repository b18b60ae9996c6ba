
// the collection of utility functions mainly for bracket parsing and proceeding

/// true when every closing bracket matches the latest open one and nothing stays open
pub fn brackets_are_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

pub fn find_char_positions(input: &str, target_char: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut start_pos = 0;

    while let Some(pos) = input[start_pos..].find(target_char) {
        positions.push(start_pos + pos);
        start_pos += pos + target_char.len_utf8();
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_are_balanced() {
        assert!(brackets_are_balanced("2*(x + 1) = 3"));
        assert!(brackets_are_balanced("x + 1"));
        assert!(brackets_are_balanced("((x))*[y]"));
        assert!(!brackets_are_balanced("(x + 1"));
        assert!(!brackets_are_balanced("x + 1)"));
        assert!(!brackets_are_balanced("(x]"));
    }

    #[test]
    fn test_find_char_positions() {
        assert_eq!(find_char_positions("x = 1 and y = 2", '='), vec![2, 12]);
        assert!(find_char_positions("x + 1", '=').is_empty());
    }
}
