//! Google encoded polyline codec.
//! Implements the variable-length delta encoding used by the Directions API
//! for `overview_polyline.points` and per-step `polyline.points`.
//!
//! See: https://developers.google.com/maps/documentation/utilities/polylinealgorithm

use crate::error::{Error, PolylineErrorKind, Result};
use crate::geo::GeoPoint;

/// Fixed-point precision of the encoding (five decimal places).
pub const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit chunk so it lands in printable ASCII.
const CHAR_OFFSET: u8 = 63;

/// Highest byte the encoding can produce (`0x3f | 0x20` plus the offset).
const MAX_CHAR: u8 = b'~';

/// Bits carried by each encoded character.
const CHUNK_BITS: u32 = 5;

/// Mask for the payload bits of a chunk.
const CHUNK_MASK: i64 = 0x1f;

/// Continuation flag: more chunks follow for the current value.
const CONTINUATION: i64 = 0x20;

/// A 32-bit zigzagged delta never needs more than seven chunks.
const MAX_CHUNKS: u32 = 7;

/// Payload bits the seventh chunk may carry before a value exceeds 32 bits.
const LAST_CHUNK_MASK: i64 = 0x03;

/// Reads zigzag-encoded signed values from the character stream.
struct ValueReader<'a> {
    input: &'a str,
    bytes: &'a [u8],
    index: usize,
}

impl<'a> ValueReader<'a> {
    fn new(input: &'a str) -> Self {
        ValueReader {
            input,
            bytes: input.as_bytes(),
            index: 0,
        }
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.bytes.len()
    }

    fn error(&self, position: usize, reason: PolylineErrorKind) -> Error {
        Error::PolylineDecode { position, reason }
    }

    fn next_value(&mut self) -> Result<i64> {
        let start = self.index;
        let mut result: i64 = 0;
        let mut chunks = 0u32;

        loop {
            let byte = match self.bytes.get(self.index) {
                Some(&byte) => byte,
                None => return Err(self.error(self.index, PolylineErrorKind::Truncated)),
            };
            if !(CHAR_OFFSET..=MAX_CHAR).contains(&byte) {
                // Every byte before `index` was ASCII, so `index` is a char boundary.
                let c = self.input[self.index..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(self.error(self.index, PolylineErrorKind::InvalidCharacter(c)));
            }
            if chunks == MAX_CHUNKS {
                return Err(self.error(start, PolylineErrorKind::Overflow));
            }

            let chunk = i64::from(byte - CHAR_OFFSET);
            if chunks == MAX_CHUNKS - 1 && chunk & CHUNK_MASK & !LAST_CHUNK_MASK != 0 {
                return Err(self.error(start, PolylineErrorKind::Overflow));
            }
            result |= (chunk & CHUNK_MASK) << (chunks * CHUNK_BITS);
            chunks += 1;
            self.index += 1;

            if chunk & CONTINUATION == 0 {
                break;
            }
        }

        Ok(if result & 1 == 1 {
            !(result >> 1)
        } else {
            result >> 1
        })
    }
}

/// Decode an encoded polyline into the points it describes, in traversal order.
///
/// An empty string decodes to an empty path. Malformed input (a byte outside
/// the encoding alphabet, a stream that stops mid-value or after a lone
/// latitude, a value wider than 32 bits, or a point whose running sum leaves
/// the valid latitude/longitude range) fails with [`Error::PolylineDecode`];
/// no partial path is returned.
///
/// # Example
///
/// ```
/// use safezone_lib::polyline::decode;
///
/// let path = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!((path[0].lat, path[0].lng), (38.5, -120.2));
/// ```
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>> {
    let mut reader = ValueReader::new(encoded);
    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while !reader.is_at_end() {
        let start = reader.index;
        lat += reader.next_value()?;
        lng += reader.next_value()?;
        let point = GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION);
        if point.validate().is_err() {
            return Err(reader.error(start, PolylineErrorKind::OutOfRange));
        }
        points.push(point);
    }

    Ok(points)
}

/// Encode points into a polyline string at five-decimal precision.
///
/// Coordinates are rounded half away from zero before delta encoding, so
/// `decode(&encode(p)?)` reproduces `p` to within `1e-5` degrees. Every point
/// must be a valid coordinate; the first one that is not fails with
/// [`Error::InvalidCoordinate`].
pub fn encode(points: &[GeoPoint]) -> Result<String> {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        point.validate()?;
        let lat = to_fixed(point.lat);
        let lng = to_fixed(point.lng);
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    Ok(out)
}

fn to_fixed(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

fn write_value(out: &mut String, value: i64) {
    let mut zigzag = if value < 0 { !(value << 1) } else { value << 1 };
    while zigzag >= CONTINUATION {
        let chunk = (CONTINUATION | (zigzag & CHUNK_MASK)) as u8;
        out.push(char::from(chunk + CHAR_OFFSET));
        zigzag >>= CHUNK_BITS;
    }
    out.push(char::from(zigzag as u8 + CHAR_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn canonical_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ]
    }

    #[test]
    fn decode_empty_is_empty() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn decode_canonical_vector() {
        assert_eq!(decode(CANONICAL).unwrap(), canonical_points());
    }

    #[test]
    fn encode_canonical_vector() {
        assert_eq!(encode(&canonical_points()).unwrap(), CANONICAL);
    }

    #[test]
    fn encode_empty_is_empty() {
        assert_eq!(encode(&[]).unwrap(), "");
    }

    #[test]
    fn decode_keeps_repeated_points() {
        let points = vec![
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(1.0, 2.0),
        ];
        let decoded = decode(&encode(&points).unwrap()).unwrap();
        assert_eq!(decoded, points);
    }

    #[test]
    fn single_zero_point() {
        // Two zero deltas are encoded as '?' each.
        assert_eq!(encode(&[GeoPoint::new(0.0, 0.0)]).unwrap(), "??");
        assert_eq!(decode("??").unwrap(), vec![GeoPoint::new(0.0, 0.0)]);
    }

    #[test]
    fn truncated_mid_value() {
        // '_' carries the continuation bit, so the stream stops mid-value.
        let err = decode("_p~iF~ps|U_").unwrap_err();
        match err {
            Error::PolylineDecode { position, reason } => {
                assert_eq!(reason, PolylineErrorKind::Truncated);
                assert_eq!(position, 11);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn latitude_without_longitude() {
        let err = decode("_p~iF").unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 5,
                reason: PolylineErrorKind::Truncated
            }
        ));
    }

    #[test]
    fn invalid_character_is_reported() {
        let err = decode("_p~iF ps|U").unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 5,
                reason: PolylineErrorKind::InvalidCharacter(' ')
            }
        ));
    }

    #[test]
    fn non_ascii_character_is_reported() {
        let err = decode("??é?").unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 2,
                reason: PolylineErrorKind::InvalidCharacter('é')
            }
        ));
    }

    #[test]
    fn endless_continuation_overflows_instead_of_looping() {
        let crafted = "~".repeat(64);
        let err = decode(&crafted).unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 0,
                reason: PolylineErrorKind::Overflow
            }
        ));
    }

    #[test]
    fn negative_and_extreme_coordinates() {
        let points = vec![
            GeoPoint::new(-90.0, -180.0),
            GeoPoint::new(90.0, 180.0),
            GeoPoint::new(0.00001, -0.00001),
        ];
        let decoded = decode(&encode(&points).unwrap()).unwrap();
        for (a, b) in points.iter().zip(&decoded) {
            assert!((a.lat - b.lat).abs() < 1e-9);
            assert!((a.lng - b.lng).abs() < 1e-9);
        }
    }

    #[test]
    fn seventh_chunk_wider_than_32_bits_overflows() {
        // Six full continuation chunks, then a final chunk carrying bit 32.
        let err = decode("~~~~~~C??").unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 0,
                reason: PolylineErrorKind::Overflow
            }
        ));
    }

    #[test]
    fn widest_32_bit_value_is_range_checked() {
        // Decodes to a latitude delta of -2^31, far outside the globe.
        let err = decode("~~~~~~B?").unwrap_err();
        assert!(matches!(
            err,
            Error::PolylineDecode {
                position: 0,
                reason: PolylineErrorKind::OutOfRange
            }
        ));
    }

    #[test]
    fn running_sum_past_the_pole_is_out_of_range() {
        // Three latitude deltas of +80 degrees: 80, 160, 240.
        let err = decode("__hgN?__hgN?__hgN?").unwrap_err();
        match err {
            Error::PolylineDecode { position, reason } => {
                assert_eq!(reason, PolylineErrorKind::OutOfRange);
                assert_eq!(position, 6, "second point starts at byte 6");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(decode("__hgN?").is_ok());
    }

    #[test]
    fn longitude_past_the_antimeridian_is_out_of_range() {
        let path = vec![GeoPoint::new(0.0, 179.0)];
        let mut encoded = encode(&path).unwrap();
        // Append a point two degrees further east.
        write_value(&mut encoded, 0);
        write_value(&mut encoded, 200_000);
        assert!(matches!(
            decode(&encoded),
            Err(Error::PolylineDecode {
                reason: PolylineErrorKind::OutOfRange,
                ..
            })
        ));
    }

    #[test]
    fn encode_rejects_invalid_points() {
        for bad in [
            GeoPoint::new(f64::NAN, f64::NAN),
            GeoPoint::new(1e300, 0.0),
            GeoPoint::new(0.0, f64::NEG_INFINITY),
            GeoPoint::new(90.5, 0.0),
        ] {
            let result = encode(&[GeoPoint::new(1.0, 1.0), bad]);
            assert!(
                matches!(result, Err(Error::InvalidCoordinate { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
