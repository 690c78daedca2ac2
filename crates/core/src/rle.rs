//! Board run-length codec
//!
//! A grid is flattened row-major and written as comma-separated
//! `<value>x<count>` runs, e.g. `[0, 0, 1, 1]` becomes `"0x2,1x2"`.
//! Decoding pads a short final row and any missing rows with empty cells,
//! so `decode("", w, h)` is an all-empty grid.

use std::fmt::Write;

use thiserror::Error;

use crate::types::CELL_EMPTY;

/// Failure to decode a board string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RleError {
    #[error("malformed run `{0}`, expected <value>x<count>")]
    MalformedRun(String),
    #[error("run `{0}` has a zero count")]
    EmptyRun(String),
    #[error("runs describe more than {width}x{height} cells")]
    Overflow { width: usize, height: usize },
}

/// Encode a flat cell sequence
pub fn encode(cells: &[u8]) -> String {
    encode_iter(cells.iter().copied())
}

/// Encode rows of cells, flattened row-major
pub fn encode_grid<R: AsRef<[u8]>>(rows: &[R]) -> String {
    encode_iter(rows.iter().flat_map(|row| row.as_ref().iter().copied()))
}

fn encode_iter(cells: impl Iterator<Item = u8>) -> String {
    let mut out = String::new();
    let mut run: Option<(u8, usize)> = None;

    for cell in cells {
        run = match run {
            Some((value, count)) if value == cell => Some((value, count + 1)),
            Some((value, count)) => {
                push_run(&mut out, value, count);
                Some((cell, 1))
            }
            None => Some((cell, 1)),
        };
    }
    if let Some((value, count)) = run {
        push_run(&mut out, value, count);
    }

    out
}

fn push_run(out: &mut String, value: u8, count: usize) {
    if !out.is_empty() {
        out.push(',');
    }
    // Writing into a String cannot fail
    let _ = write!(out, "{}x{}", value, count);
}

fn parse_run(token: &str) -> Result<(u8, usize), RleError> {
    let malformed = || RleError::MalformedRun(token.to_string());

    let (value, count) = token.trim().split_once('x').ok_or_else(malformed)?;
    let value: u8 = value.parse().map_err(|_| malformed())?;
    let count: usize = count.parse().map_err(|_| malformed())?;
    if count == 0 {
        return Err(RleError::EmptyRun(token.to_string()));
    }
    Ok((value, count))
}

/// Decode a board string into `height` rows of `width` cells
pub fn decode(text: &str, width: usize, height: usize) -> Result<Vec<Vec<u8>>, RleError> {
    let overflow = || RleError::Overflow { width, height };
    let capacity = width.checked_mul(height).ok_or_else(overflow)?;
    let mut flat: Vec<u8> = Vec::new();

    if !text.trim().is_empty() {
        for token in text.split(',') {
            let (value, count) = parse_run(token)?;
            let end = flat
                .len()
                .checked_add(count)
                .filter(|&n| n <= capacity)
                .ok_or_else(overflow)?;
            flat.resize(end, value);
        }
    }

    if width == 0 {
        return Ok(vec![Vec::new(); height]);
    }

    flat.resize(capacity, CELL_EMPTY);
    Ok(flat.chunks(width).map(<[u8]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_runs() {
        assert_eq!(encode(&[0, 0, 1, 1]), "0x2,1x2");
        assert_eq!(encode(&[2]), "2x1");
        assert_eq!(encode(&[0, 1, 0]), "0x1,1x1,0x1");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_encode_grid_flattens_rows() {
        let grid = [[0u8, 0], [1, 1]];
        assert_eq!(encode_grid(&grid), "0x2,1x2");
        let empty = [[0u8; 10]; 20];
        assert_eq!(encode_grid(&empty), "0x200");
    }

    #[test]
    fn test_decode_rows() {
        assert_eq!(decode("0x2,1x2", 2, 2).unwrap(), vec![vec![0, 0], vec![1, 1]]);
    }

    #[test]
    fn test_decode_pads_short_input() {
        assert_eq!(
            decode("1x3", 2, 3).unwrap(),
            vec![vec![1, 1], vec![1, 0], vec![0, 0]]
        );
        assert_eq!(decode("", 3, 2).unwrap(), vec![vec![0; 3]; 2]);
    }

    #[test]
    fn test_decode_rejects_malformed_runs() {
        assert!(matches!(decode("0y2", 2, 2), Err(RleError::MalformedRun(_))));
        assert!(matches!(decode("0x2,", 2, 2), Err(RleError::MalformedRun(_))));
        assert!(matches!(decode("ax2", 2, 2), Err(RleError::MalformedRun(_))));
        assert!(matches!(decode("0x0", 2, 2), Err(RleError::EmptyRun(_))));
    }

    #[test]
    fn test_decode_rejects_overflow() {
        assert_eq!(
            decode("0x5", 2, 2),
            Err(RleError::Overflow {
                width: 2,
                height: 2
            })
        );
    }

    #[test]
    fn test_decode_rejects_huge_run_counts() {
        let text = format!("1x1,0x{}", usize::MAX);
        assert_eq!(
            decode(&text, 2, 2),
            Err(RleError::Overflow {
                width: 2,
                height: 2
            })
        );
        assert!(decode("0x1", usize::MAX, 2).is_err());
    }

    #[test]
    fn test_roundtrip_preserves_grid() {
        let mut grid = vec![vec![0u8; 10]; 20];
        grid[19] = vec![1; 10];
        grid[18][3] = 1;
        grid[0][4] = 2;
        grid[1][4] = 2;
        let text = encode_grid(&grid);
        assert_eq!(decode(&text, 10, 20).unwrap(), grid);
    }
}
