use crate::models::geo::Coordinate;

/// Decodes Google's encoded-polyline format into a coordinate sequence.
///
/// The input is a stream of 5-bit groups reconstructed from ASCII bytes
/// offset by -63, accumulated little-endian until a group's continuation
/// bit (0x20) is clear. The resulting value's least-significant bit is a
/// sign flag; the remaining bits are the magnitude of a delta applied to a
/// running accumulator, latitude and longitude strictly alternating, each
/// emitted at 1e-5 precision.
///
/// Never fails: malformed or truncated input yields a truncated sequence,
/// which callers render as "no path to draw".
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        let Some((delta_lat, next)) = next_delta(bytes, index) else {
            break;
        };
        lat += delta_lat;
        index = next;

        let Some((delta_lon, next)) = next_delta(bytes, index) else {
            break;
        };
        lon += delta_lon;
        index = next;

        path.push(Coordinate {
            lat: lat as f64 * 1e-5,
            lon: lon as f64 * 1e-5,
        });
    }

    path
}

/// Reads one varint group starting at `index` and returns the signed delta
/// plus the index past it, or `None` if the input ends mid-group.
fn next_delta(bytes: &[u8], mut index: usize) -> Option<(i64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;

    loop {
        let chunk = bytes.get(index)?.wrapping_sub(63) as u64;
        index += 1;
        value |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
        // A well-formed group never exceeds 12 chunks; bail on garbage
        // rather than overflow the shift.
        if shift > 60 {
            return None;
        }
    }

    // Sign flag in the low bit: negate via bitwise-not, matching the
    // encoder's zig-zag of `value << 1 ^ (value >> 63)`.
    let delta = if value & 1 == 1 {
        !(value >> 1) as i64
    } else {
        (value >> 1) as i64
    };

    Some((delta, index))
}

#[cfg(test)]
mod tests {
    use super::decode;

    // The worked example from Google's polyline documentation.
    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decodes_canonical_example() {
        let path = decode(CANONICAL);

        assert_eq!(path.len(), 3);
        assert!(close(path[0].lat, 38.5) && close(path[0].lon, -120.2));
        assert!(close(path[1].lat, 40.7) && close(path[1].lon, -120.95));
        assert!(close(path[2].lat, 43.252) && close(path[2].lon, -126.453));
    }

    #[test]
    fn decode_is_deterministic() {
        assert_eq!(decode(CANONICAL), decode(CANONICAL));
    }

    #[test]
    fn empty_input_yields_empty_path() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn truncated_input_yields_truncated_path() {
        // Cut the canonical string mid-coordinate: the complete pairs
        // survive, the dangling tail is dropped.
        let path = decode(&CANONICAL[..CANONICAL.len() - 3]);
        assert_eq!(path.len(), 2);
        assert!(close(path[1].lat, 40.7) && close(path[1].lon, -120.95));
    }

    #[test]
    fn single_point_round_trips_sign_handling() {
        // "_p~iF~ps|U" is (38.5, -120.2) alone: a positive and a negative
        // delta, exercising both sign branches.
        let path = decode("_p~iF~ps|U");
        assert_eq!(path.len(), 1);
        assert!(close(path[0].lat, 38.5) && close(path[0].lon, -120.2));
    }

    #[test]
    fn garbage_input_does_not_panic() {
        // All-continuation bytes never terminate a group.
        let garbage: String = std::iter::repeat('\u{7f}').take(64).collect();
        assert!(decode(&garbage).is_empty());
    }
}
