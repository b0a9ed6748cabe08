//! Problem files and result output.
//!
//! Problem files are line oriented; `#` starts a comment:
//!
//! ```text
//! mode binary              # or: mode weighted [max_value]
//! size 4                   # image size, before any vector
//! required 1 1 1 0         # optional, at most once
//! picture 1 1 0 0
//! picture 0 0 1 1
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::calculator::{Calculator, ColorMode};
use crate::error::{Error, Result};
use crate::solution::Cover;

/// Loads a problem file into a configured calculator.
pub fn load(path: impl AsRef<Path>) -> Result<Calculator> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parses problem text into a configured calculator.
pub fn parse(text: &str) -> Result<Calculator> {
    let lines: Vec<(usize, Vec<&str>)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let content = line.split('#').next().unwrap_or("");
            (index + 1, content.split_whitespace().collect::<Vec<_>>())
        })
        .filter(|(_, words)| !words.is_empty())
        .collect();

    let picture_count = lines
        .iter()
        .filter(|(_, words)| words[0] == "picture")
        .count();

    let mut mode: Option<ColorMode> = None;
    let mut calculator: Option<Calculator> = None;

    for (line, words) in &lines {
        let line = *line;
        let (keyword, args) = (words[0], &words[1..]);
        match keyword {
            "mode" => {
                if mode.is_some() {
                    return Err(parse_error(line, "mode given twice"));
                }
                mode = Some(parse_mode(line, args)?);
            }
            "size" => {
                let Some(mode) = mode else {
                    return Err(parse_error(line, "size before mode"));
                };
                if calculator.is_some() {
                    return Err(parse_error(line, "size given twice"));
                }
                let [size] = args else {
                    return Err(parse_error(line, "expected: size <image_size>"));
                };
                let size = parse_number(line, size)?;
                calculator = Some(Calculator::new(picture_count, size as usize, mode));
            }
            "required" | "picture" => {
                let Some(calculator) = calculator.as_mut() else {
                    return Err(parse_error(line, format!("{keyword} before size")));
                };
                let values = args
                    .iter()
                    .map(|word| parse_number(line, word))
                    .collect::<Result<Vec<_>>>()?;
                let added = if keyword == "required" {
                    calculator.set_required_cover(&values)
                } else {
                    calculator.add_picture(&values)
                };
                added.map_err(|err| parse_error(line, err.to_string()))?;
            }
            other => return Err(parse_error(line, format!("unknown directive '{other}'"))),
        }
    }

    calculator.ok_or_else(|| parse_error(lines.len(), "missing mode or size"))
}

fn parse_mode(line: usize, args: &[&str]) -> Result<ColorMode> {
    match args {
        ["binary"] => Ok(ColorMode::Binary),
        ["weighted"] => Ok(ColorMode::weighted()),
        ["weighted", max_value] => Ok(ColorMode::Weighted {
            max_value: parse_number(line, max_value)?,
        }),
        _ => Err(parse_error(
            line,
            "expected: mode binary | mode weighted [max_value]",
        )),
    }
}

fn parse_number(line: usize, word: &str) -> Result<u32> {
    word.parse()
        .map_err(|_| parse_error(line, format!("invalid number '{word}'")))
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Saves a cover in human-readable text form.
pub fn save_cover(path: impl AsRef<Path>, cover: &Cover) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", cover)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
# three pictures over four elements
mode binary
size 4
picture 1 1 0 0
picture 0 0 1 1   # right half
picture 1 0 0 1
";

    #[test]
    fn test_parse_binary_problem() {
        let mut calculator = parse(SCENARIO).unwrap();
        assert_eq!(calculator.mode(), ColorMode::Binary);
        assert_eq!(calculator.image_size(), 4);
        assert_eq!(calculator.picture_count(), 3);
        assert_eq!(calculator.max_pictures(), 3);

        let cover = calculator.greedy().unwrap();
        assert_eq!(cover.pictures, vec![0, 1]);
    }

    #[test]
    fn test_parse_weighted_problem() {
        let text = "mode weighted 10\nsize 2\nrequired 10 10\npicture 10 0\npicture 0 5\n";
        let mut calculator = parse(text).unwrap();
        assert_eq!(calculator.mode(), ColorMode::Weighted { max_value: 10 });

        let cover = calculator.exact(None).unwrap();
        assert_eq!(cover.fraction(), 0.75);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse("mode binary\nsize 2\npicture 1 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{err}");

        let err = parse("size 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }), "{err}");

        let err = parse("mode binary\nsize 2\nshape 1 1\n").unwrap_err();
        assert!(err.to_string().contains("unknown directive 'shape'"));

        let err = parse("mode binary\nsize x\n").unwrap_err();
        assert!(err.to_string().contains("invalid number 'x'"));

        assert!(parse("# nothing here\n").is_err());
    }

    #[test]
    fn test_save_cover_writes_text() {
        let path = std::env::temp_dir().join(format!("setcover-{}.txt", std::process::id()));
        let cover = Cover {
            pictures: vec![1, 0],
            covered: 4,
            required: 4,
        };
        save_cover(&path, &cover).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, format!("{}\n", cover));
    }
}
