//! [`Compact`] search and processing.
use parity_scale_codec::{Compact, Decode, HasCompact};

use crate::error::ParserError;

/// Search data for a compact at `position` by brute force.
///
/// Tries to find the shortest `[u8]` slice starting at `position` that could
/// be decoded as a compact. On success moves `position` to the first element
/// after the compact part.
pub fn get_compact<T>(data: &[u8], position: &mut usize) -> Result<T, ParserError>
where
    T: HasCompact,
    Compact<T>: Decode,
{
    if data.len() <= *position {
        return Err(ParserError::DataTooShort {
            position: *position,
            minimal_length: 1,
        });
    }
    let mut out = None;
    for i in *position..data.len() {
        let mut trial = &data[*position..=i];
        if let Ok(Compact(value)) = <Compact<T>>::decode(&mut trial) {
            *position = i + 1;
            out = Some(value);
            break;
        }
    }
    match out {
        Some(compact) => Ok(compact),
        None => Err(ParserError::NoCompact {
            position: *position,
        }),
    }
}
