use crate::error::StfError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare item: keywords, numbers (with any unit suffix), unquoted names
    Word(String),
    /// Quoted string (content without quotes, escapes resolved, `+` joins applied)
    Str(String),
    LParen,
    RParen,
    // End of input
    Eof,
}

impl Token {
    /// Text of the token as a reader hands it out.
    pub fn text(&self) -> &str {
        match self {
            Token::Word(w) | Token::Str(w) => w,
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Eof => "",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}

pub fn lex(src: &str, filename: &str) -> Result<Vec<Spanned>, StfError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            pos += 1;
            continue;
        }

        let tok_line = line;

        match c {
            '(' => {
                tokens.push(Spanned {
                    token: Token::LParen,
                    line: tok_line,
                });
                pos += 1;
                continue;
            }
            ')' => {
                tokens.push(Spanned {
                    token: Token::RParen,
                    line: tok_line,
                });
                pos += 1;
                continue;
            }
            '"' => {
                let mut s = lex_string(&chars, &mut pos, &mut line, filename)?;
                // "part one" + "part two" joins into a single item
                loop {
                    let (mut look, mut look_line) = (pos, line);
                    skip_whitespace(&chars, &mut look, &mut look_line);
                    if look >= chars.len() || chars[look] != '+' {
                        break;
                    }
                    look += 1;
                    skip_whitespace(&chars, &mut look, &mut look_line);
                    if look >= chars.len() || chars[look] != '"' {
                        break;
                    }
                    pos = look;
                    line = look_line;
                    s.push_str(&lex_string(&chars, &mut pos, &mut line, filename)?);
                }
                tokens.push(Spanned {
                    token: Token::Str(s),
                    line: tok_line,
                });
                continue;
            }
            _ => {}
        }

        let start = pos;
        while pos < chars.len()
            && !chars[pos].is_whitespace()
            && !matches!(chars[pos], '(' | ')' | '"')
        {
            pos += 1;
        }
        tokens.push(Spanned {
            token: Token::Word(chars[start..pos].iter().collect()),
            line: tok_line,
        });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
    });
    Ok(tokens)
}

fn skip_whitespace(chars: &[char], pos: &mut usize, line: &mut u32) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        if chars[*pos] == '\n' {
            *line += 1;
        }
        *pos += 1;
    }
}

/// Lex one quoted string starting at the opening quote. Strings may span lines.
fn lex_string(
    chars: &[char],
    pos: &mut usize,
    line: &mut u32,
    filename: &str,
) -> Result<String, StfError> {
    let start_line = *line;
    let unterminated = || StfError::UnterminatedString {
        file: filename.to_owned(),
        line: start_line,
    };
    *pos += 1; // opening quote
    let mut s = String::new();
    loop {
        if *pos >= chars.len() {
            return Err(unterminated());
        }
        let sc = chars[*pos];
        match sc {
            '"' => {
                *pos += 1;
                return Ok(s);
            }
            '\\' => {
                *pos += 1;
                if *pos >= chars.len() {
                    return Err(unterminated());
                }
                match chars[*pos] {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            '\n' => {
                *line += 1;
                s.push(sc);
            }
            _ => s.push(sc),
        }
        *pos += 1;
    }
}
