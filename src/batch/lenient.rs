/// Drop commas that directly precede `]` or `}` (whitespace allowed in between),
/// leaving string literals untouched. Everything else passes through as is, so
/// strict JSON comes out unchanged.
pub fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < len {
        match chars[i] {
            '"' => copy_string(&chars, &mut i, &mut out),
            ',' if closes_next(&chars, i + 1) => {
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Copy a string literal starting at the opening quote, escapes included.
/// An unterminated literal is copied to the end and left for the parser to reject.
fn copy_string(chars: &[char], i: &mut usize, out: &mut String) {
    out.push(chars[*i]);
    *i += 1;

    while *i < chars.len() {
        let c = chars[*i];
        out.push(c);
        *i += 1;

        match c {
            '\\' if *i < chars.len() => {
                out.push(chars[*i]);
                *i += 1;
            }
            '"' => return,
            _ => {}
        }
    }
}

fn closes_next(chars: &[char], from: usize) -> bool {
    chars[from..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| matches!(c, ']' | '}'))
}
