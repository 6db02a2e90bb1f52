use super::CityRegistry;
use std::{collections::HashMap, fmt::Write, fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read cities file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `label x y`")]
    MissingField { line: usize },
    #[error("line {line}: invalid coordinate '{value}'")]
    InvalidCoordinate { line: usize, value: String },
    #[error("line {line}: unexpected trailing field")]
    TrailingField { line: usize },
    #[error("line {line}: label '{label}' already used on line {first}")]
    DuplicateLabel {
        line: usize,
        label: String,
        first: usize,
    },
}

/// Parses the `label x y` per line format. Blank lines are skipped. Labels
/// must be unique.
pub fn parse_cities(input: &str) -> Result<CityRegistry, ParseError> {
    let mut points = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let mut fields = raw.split_whitespace();
        let label = match fields.next() {
            Some(label) => label,
            None => continue,
        };
        let x = parse_coordinate(fields.next(), line)?;
        let y = parse_coordinate(fields.next(), line)?;
        if fields.next().is_some() {
            return Err(ParseError::TrailingField { line });
        }
        if let Some(&first) = seen.get(label) {
            return Err(ParseError::DuplicateLabel {
                line,
                label: label.to_string(),
                first,
            });
        }
        seen.insert(label, line);
        points.push((Some(label.to_string()), (x, y)));
    }
    Ok(CityRegistry::new(points))
}

fn parse_coordinate(field: Option<&str>, line: usize) -> Result<f64, ParseError> {
    let value = field.ok_or(ParseError::MissingField { line })?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidCoordinate {
            line,
            value: value.to_string(),
        }),
    }
}

pub fn load_cities<P: AsRef<Path>>(path: P) -> Result<CityRegistry, ParseError> {
    let content = fs::read_to_string(path)?;
    parse_cities(&content)
}

pub fn write_cities(registry: &CityRegistry) -> String {
    let mut out = String::new();
    for (i, city) in registry.cities().iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} {}",
            registry.label(i),
            city.position.0,
            city.position.1
        );
    }
    out
}
