//! Plain-text geometry files.
//!
//! The format is line based:
//!
//! ```text
//! # a comment
//! [points]
//! -1.0 -1.0  1.0 0.0 0.0
//! [indices]
//! 0 1 2
//! ```
//!
//! `[points]` lines carry x, y, r, g, b and `[indices]` lines one triangle.
//! Headers match exactly. Empty lines and lines starting with `#` are skipped,
//! and lines before the first header are ignored.
//!
//! Values are read like C++ stream extraction: each field takes the longest
//! numeric prefix of what is left on the line, so `1.0abc` reads `1.0` and the
//! next field starts at `abc`. An index above `65535` reads as `65535` and
//! fails the line, and a negative index wraps around.

use std::path::Path;

use crate::{
    data_structures::geometry::{FLOATS_PER_VERTEX, Geometry, INDICES_PER_TRIANGLE},
    resources::load_string,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    None,
    Points,
    Indices,
}

pub fn load_geometry(path: &Path) -> anyhow::Result<Geometry> {
    let text = load_string(path)?;
    let geometry = parse_geometry(&text);
    log::info!(
        "Loaded {} vertices and {} indices from {}",
        geometry.vertex_count(),
        geometry.indices.len(),
        path.display()
    );
    Ok(geometry)
}

/**
 * Parse geometry text into a point list and an index list.
 *
 * Data lines are not validated. A line with too few values repeats the last
 * value read for its kind (zero before the first one), and a value that does
 * not parse becomes zero together with every field after it on that line.
 */
pub fn parse_geometry(text: &str) -> Geometry {
    let mut geometry = Geometry::default();
    let mut section = Section::None;
    let mut value = 0.0_f32;
    let mut index = 0_u16;

    for (number, line) in text.lines().enumerate() {
        match line {
            "[points]" => section = Section::Points,
            "[indices]" => section = Section::Indices,
            _ if line.is_empty() || line.starts_with('#') => (),
            _ => {
                let well_formed = match section {
                    Section::Points => {
                        read_fields(line, FLOATS_PER_VERTEX, &mut value, &mut geometry.points)
                    }
                    Section::Indices => {
                        read_fields(line, INDICES_PER_TRIANGLE, &mut index, &mut geometry.indices)
                    }
                    Section::None => true,
                };
                if !well_formed {
                    log::warn!(
                        "Malformed {:?} line {}: {:?}",
                        section,
                        number + 1,
                        line
                    );
                }
            }
        }
    }
    geometry
}

/// Append exactly `count` values read from `line` to `out`.
///
/// Returns false when the line did not hold `count` readable values. The
/// field that failed stores what [`Field::extract`] left, later fields repeat
/// it. A line that ends early repeats the last value read.
fn read_fields<T: Field>(line: &str, count: usize, last: &mut T, out: &mut Vec<T>) -> bool {
    let mut rest = line;
    let mut well_formed = true;
    for _ in 0..count {
        if well_formed {
            rest = rest.trim_start();
            if rest.is_empty() {
                well_formed = false;
            } else {
                let (value, read, consumed) = T::extract(rest);
                *last = value;
                well_formed = read;
                rest = &rest[consumed..];
            }
        }
        out.push(*last);
    }
    well_formed
}

/// A number that can be read from the start of a string.
trait Field: Copy + Default {
    /// Read the longest numeric prefix of `input`.
    ///
    /// Returns the value to store, whether the read succeeded and how many
    /// bytes it consumed.
    fn extract(input: &str) -> (Self, bool, usize);
}

impl Field for f32 {
    fn extract(input: &str) -> (Self, bool, usize) {
        let bytes = input.as_bytes();
        let mut end = sign_len(bytes);
        let int_digits = digits_len(&bytes[end..]);
        end += int_digits;
        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            frac_digits = digits_len(&bytes[end + 1..]);
            end += 1 + frac_digits;
        }
        if int_digits + frac_digits == 0 {
            return (0.0, false, end);
        }
        // The exponent only counts when digits follow it.
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let exp_sign = sign_len(&bytes[end + 1..]);
            let exp_digits = digits_len(&bytes[end + 1 + exp_sign..]);
            if exp_digits > 0 {
                end += 1 + exp_sign + exp_digits;
            }
        }
        match input[..end].parse() {
            Ok(value) => (value, true, end),
            Err(_) => (0.0, false, end),
        }
    }
}

impl Field for u16 {
    fn extract(input: &str) -> (Self, bool, usize) {
        let bytes = input.as_bytes();
        let sign = sign_len(bytes);
        let end = sign + digits_len(&bytes[sign..]);
        if end == sign {
            return (0, false, end);
        }
        match input[sign..end].parse::<u16>() {
            Ok(value) if bytes[0] == b'-' => (value.wrapping_neg(), true, end),
            Ok(value) => (value, true, end),
            Err(_) => (u16::MAX, false, end),
        }
    }
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn digits_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_repeat_the_last_value() {
        let geometry = parse_geometry("[points]\n1 2 3\n[indices]\n4 5\n");
        assert_eq!(geometry.points, vec![1.0, 2.0, 3.0, 3.0, 3.0]);
        assert_eq!(geometry.indices, vec![4, 5, 5]);
    }

    #[test]
    fn unparsable_field_zeroes_the_rest_of_the_line() {
        let geometry = parse_geometry("[points]\n1 x 3 4 5\n");
        assert_eq!(geometry.points, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn trailing_garbage_ends_a_value_and_fails_the_next_one() {
        let geometry = parse_geometry("[points]\n1.0abc 2 3 4 5\n");
        assert_eq!(geometry.points, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn values_read_up_to_the_first_non_numeric_character() {
        let geometry = parse_geometry("[points]\n-1.5e1x 2 3 4 5\n");
        assert_eq!(geometry.points, vec![-15.0, 0.0, 0.0, 0.0, 0.0]);

        let geometry = parse_geometry("[points]\n2.5e 1 2 3 4\n");
        assert_eq!(geometry.points, vec![2.5, 0.0, 0.0, 0.0, 0.0]);

        let geometry = parse_geometry("[points]\n3. +.5 7 -0 1e2\n");
        assert_eq!(geometry.points, vec![3.0, 0.5, 7.0, 0.0, 100.0]);
    }

    #[test]
    fn oversized_index_clamps_and_fails_the_line() {
        let geometry = parse_geometry("[indices]\n70000 1 2\n");
        assert_eq!(geometry.indices, vec![65535, 65535, 65535]);
    }

    #[test]
    fn negative_index_wraps() {
        let geometry = parse_geometry("[indices]\n-1 +2 3\n");
        assert_eq!(geometry.indices, vec![65535, 2, 3]);
    }

    #[test]
    fn lines_before_the_first_header_are_skipped() {
        let geometry = parse_geometry("1 2 3 4 5\n[points]\n6 7 8 9 10\n");
        assert_eq!(geometry.points, vec![6.0, 7.0, 8.0, 9.0, 10.0]);
    }
}
