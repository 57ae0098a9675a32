use thiserror::Error;
use tracing::info;

use crate::guillotine::Bin;
use crate::types::{Item, Rect};

/// Shape problems in the instance text. Everything here is rejected before
/// the packing core ever sees the data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("missing header line 'n m'")]
    MissingHeader,
    #[error("line {line}: expected {expected} fields, got {got}")]
    WrongFieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("line {line}: '{token}' is not a positive integer")]
    BadToken { line: usize, token: String },
    #[error("line {line}: dimensions must be positive")]
    ZeroDimension { line: usize },
    #[error("line {line}: bin cost must be positive")]
    ZeroCost { line: usize },
    #[error("expected {expected} record lines, got {got}")]
    Truncated { expected: usize, got: usize },
}

/// A validated problem instance. Item and bin ids are 1-based in input
/// order; item dimensions are already canonicalized (width >= height).
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub items: Vec<Item>,
    pub bins: Vec<Bin>,
}

impl Instance {
    /// Parses the whitespace format:
    ///
    /// ```text
    /// n m
    /// w h      (n item lines)
    /// w h c    (m bin lines)
    /// ```
    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (line, header) = lines.next().ok_or(InstanceError::MissingHeader)?;
        let counts = parse_fields(line, header, 2)?;
        let (n, m) = (counts[0] as usize, counts[1] as usize);

        let mut items = Vec::with_capacity(n);
        let mut bins = Vec::with_capacity(m);
        for id in 1..=n {
            let (line, text) = lines
                .next()
                .ok_or(InstanceError::Truncated {
                    expected: n + m,
                    got: id - 1,
                })?;
            let f = parse_fields(line, text, 2)?;
            if f[0] == 0 || f[1] == 0 {
                return Err(InstanceError::ZeroDimension { line });
            }
            items.push(Item::new(id as u32, f[0], f[1]));
        }
        for id in 1..=m {
            let (line, text) = lines
                .next()
                .ok_or(InstanceError::Truncated {
                    expected: n + m,
                    got: n + id - 1,
                })?;
            let f = parse_fields(line, text, 3)?;
            if f[0] == 0 || f[1] == 0 {
                return Err(InstanceError::ZeroDimension { line });
            }
            if f[2] == 0 {
                // Cost divides the efficiency ranking; zero is undefined.
                return Err(InstanceError::ZeroCost { line });
            }
            bins.push(Bin::new(id as u32, Rect::new(f[0], f[1]), f[2]));
        }

        info!(items = items.len(), bins = bins.len(), "instance loaded");
        Ok(Self { items, bins })
    }
}

fn parse_fields(line: usize, text: &str, expected: usize) -> Result<Vec<u32>, InstanceError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != expected {
        return Err(InstanceError::WrongFieldCount {
            line,
            expected,
            got: tokens.len(),
        });
    }
    tokens
        .iter()
        .map(|t| {
            t.parse::<u32>().map_err(|_| InstanceError::BadToken {
                line,
                token: t.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_happy_path() {
        let inst = Instance::parse("2 1\n4 6\n3 3\n10 10 5\n").unwrap();
        assert_eq!(inst.items.len(), 2);
        assert_eq!(inst.bins.len(), 1);
        // Ids follow input order; item dims are canonicalized.
        assert_eq!(inst.items[0].id, 1);
        assert_eq!(inst.items[0].size, Rect::new(6, 4));
        assert_eq!(inst.bins[0].id, 1);
        assert_eq!(inst.bins[0].cost, 5);
        assert_eq!(inst.bins[0].free_rects.len(), 1);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let inst = Instance::parse("\n1 1\n\n2 3\n\n5 5 1\n\n").unwrap();
        assert_eq!(inst.items.len(), 1);
        assert_eq!(inst.bins.len(), 1);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(Instance::parse(""), Err(InstanceError::MissingHeader));
    }

    #[test]
    fn test_rejects_zero_cost() {
        let err = Instance::parse("1 1\n2 2\n5 5 0\n").unwrap_err();
        assert_eq!(err, InstanceError::ZeroCost { line: 3 });
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let err = Instance::parse("1 1\n0 2\n5 5 1\n").unwrap_err();
        assert_eq!(err, InstanceError::ZeroDimension { line: 2 });
    }

    #[test]
    fn test_rejects_negative_token() {
        let err = Instance::parse("1 1\n-2 2\n5 5 1\n").unwrap_err();
        assert!(matches!(err, InstanceError::BadToken { line: 2, .. }));
    }

    #[test]
    fn test_rejects_truncated_records() {
        let err = Instance::parse("2 1\n4 6\n").unwrap_err();
        assert_eq!(err, InstanceError::Truncated { expected: 3, got: 1 });
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        let err = Instance::parse("1 1\n4 6 9\n5 5 1\n").unwrap_err();
        assert!(matches!(err, InstanceError::WrongFieldCount { line: 2, .. }));
    }
}
