//! Info hash and file name helpers

use std::path::Path;

use sha1::{Digest, Sha1};

/// Extract info hash from magnet link
///
/// Magnet links have the format: magnet:?xt=urn:btih:HASH&...
pub fn extract_info_hash(magnet_url: &str) -> Option<String> {
    let query = magnet_url.strip_prefix("magnet:?")?;

    query
        .split('&')
        .find_map(|param| param.strip_prefix("xt=urn:btih:"))
        .filter(|hash| !hash.is_empty())
        .map(|hash| hash.to_lowercase())
}

/// Info hash of a .torrent file: SHA-1 of the bencoded `info` dictionary, lowercase hex
pub fn torrent_file_info_hash(data: &[u8]) -> Option<String> {
    let (start, end) = find_info_dict(data)?;
    let digest = Sha1::digest(&data[start..end]);
    Some(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Most common lowercase extension (with the dot) among `names` and how many files carry it
///
/// Ties go to the extension seen first; files without one count as `""`.
pub fn dominant_extension<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in names {
        let ext = Path::new(name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        match counts.iter_mut().find(|(seen, _)| *seen == ext) {
            Some((_, count)) => *count += 1,
            None => counts.push((ext, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(String, usize)>, (ext, count)| match best {
            Some(best) if best.1 >= count => Some(best),
            _ => Some((ext, count)),
        })
}

/// Byte range of the value stored under the top-level `info` key
fn find_info_dict(data: &[u8]) -> Option<(usize, usize)> {
    if data.first() != Some(&b'd') {
        return None;
    }
    let mut pos = 1;
    while data.get(pos)? != &b'e' {
        let (key, after_key) = read_string(data, pos)?;
        let after_value = skip_value(data, after_key)?;
        if key == b"info" {
            return Some((after_key, after_value));
        }
        pos = after_value;
    }
    None
}

/// Bencoded byte string at `pos`: `<len>:<bytes>`
fn read_string(data: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let colon = pos + data.get(pos..)?.iter().position(|&b| b == b':')?;
    let len: usize = std::str::from_utf8(&data[pos..colon]).ok()?.parse().ok()?;
    let end = colon.checked_add(1)?.checked_add(len)?;
    Some((data.get(colon + 1..end)?, end))
}

/// Position right after the bencoded value starting at `pos`
fn skip_value(data: &[u8], pos: usize) -> Option<usize> {
    match *data.get(pos)? {
        b'i' => Some(pos + data.get(pos..)?.iter().position(|&b| b == b'e')? + 1),
        b'l' => {
            let mut pos = pos + 1;
            while *data.get(pos)? != b'e' {
                pos = skip_value(data, pos)?;
            }
            Some(pos + 1)
        }
        b'd' => {
            let mut pos = pos + 1;
            while *data.get(pos)? != b'e' {
                let (_, after_key) = read_string(data, pos)?;
                pos = skip_value(data, after_key)?;
            }
            Some(pos + 1)
        }
        b'0'..=b'9' => read_string(data, pos).map(|(_, end)| end),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_info_hash() {
        // Standard magnet link
        let magnet = "magnet:?xt=urn:btih:abc123def456&dn=Test";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));

        // Magnet with multiple parameters
        let magnet = "magnet:?dn=Test&xt=urn:btih:abc123def456&tr=http://tracker.example.com";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));

        // Invalid magnet
        assert_eq!(extract_info_hash("http://example.com/file.torrent"), None);
        assert_eq!(extract_info_hash("not a magnet link"), None);
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:"), None);

        // Uppercase hash should be lowercased
        let magnet = "magnet:?xt=urn:btih:ABC123DEF456";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));
    }

    #[test]
    fn test_torrent_file_info_hash() {
        // Piece data may contain bytes that look like bencode markers
        let info = b"d6:lengthi12e4:name5:a.mkv6:pieces4:de:ee";
        let mut file = b"d8:announce3:url4:info".to_vec();
        file.extend_from_slice(info);
        file.push(b'e');

        let expected: String = Sha1::digest(info).iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(torrent_file_info_hash(&file), Some(expected));
    }

    #[test]
    fn test_torrent_file_info_hash_invalid() {
        assert_eq!(torrent_file_info_hash(b""), None);
        assert_eq!(torrent_file_info_hash(b"not bencode"), None);
        assert_eq!(torrent_file_info_hash(b"d8:announce3:urle"), None);
        assert_eq!(torrent_file_info_hash(b"d4:infod4:name"), None);
    }

    #[test]
    fn test_skip_value() {
        assert_eq!(skip_value(b"i42e", 0), Some(4));
        assert_eq!(skip_value(b"li1ei2ee", 0), Some(8));
        assert_eq!(skip_value(b"3:abc", 0), Some(5));
        assert_eq!(skip_value(b"d1:ai1ee", 0), Some(8));
        assert_eq!(skip_value(b"x", 0), None);
    }

    #[test]
    fn test_dominant_extension() {
        let season = ["Show/S01E01.MKV", "Show/S01E02.mkv", "Show/cover.jpg", "Show/S01E03.mkv"];
        assert_eq!(dominant_extension(season), Some((".mkv".to_string(), 3)));

        assert_eq!(
            dominant_extension(["Album/a.flac", "Album/b.cue"]),
            Some((".flac".to_string(), 1))
        );
        assert_eq!(dominant_extension(["README"]), Some((String::new(), 1)));
        assert_eq!(dominant_extension(std::iter::empty()), None);
    }
}
