/// Filename policy shared by the startup scan and the writer
///
/// Two concerns live here:
/// - natural ordering of filenames ("img2.png" before "img10.png")
/// - the zoom suffix that encodes a crop's zoom factor in the output
///   filename ("photo_1.5x.png"), with both sides of the encode/decode
///   pair kept in one place so the writer and the scanner cannot drift

/// One segment of a natural-sort key.
///
/// Variant order matters: a digit run sorts before a text run when the
/// two names diverge at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Number(u128),
    Text(String),
}

/// Split a filename into alternating digit and text runs.
///
/// Digit runs compare as integers, text runs compare case-insensitively.
pub fn natural_key(name: &str) -> Vec<Segment> {
    let mut key = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in name.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                key.push(Segment::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                key.push(Segment::Number(parse_digits(&digits)));
                digits.clear();
            }
            text.extend(c.to_lowercase());
        }
    }

    if !text.is_empty() {
        key.push(Segment::Text(text));
    }
    if !digits.is_empty() {
        key.push(Segment::Number(parse_digits(&digits)));
    }

    key
}

/// Digit runs longer than a u128 still need a consistent order.
fn parse_digits(digits: &str) -> u128 {
    digits.parse().unwrap_or(u128::MAX)
}

/// Build the filename suffix for a saved crop, e.g. `_1.5x`.
///
/// This is the only encoder; `strip_variant_suffix` is its exact inverse.
pub fn zoom_suffix(zoom: f32) -> String {
    format!("_{:.1}x", zoom)
}

/// Split a filename into stem and extension (extension keeps its dot).
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

/// Remove a trailing zoom suffix from a filename, if present.
///
/// `photo_1.5x.png` becomes `photo.png`; names without the suffix are
/// returned unchanged. This is how a saved variant is matched back to
/// its source image when computing the processed set.
pub fn strip_variant_suffix(file_name: &str) -> String {
    let (stem, ext) = split_name(file_name);

    if let Some(pos) = stem.rfind('_') {
        let (base, tail) = stem.split_at(pos);
        if is_zoom_tag(&tail[1..]) {
            return format!("{}{}", base, ext);
        }
    }

    file_name.to_string()
}

/// Matches `<digits>x` or `<digits>.<digits>x`.
fn is_zoom_tag(tag: &str) -> bool {
    let Some(body) = tag.strip_suffix('x') else {
        return false;
    };

    let mut parts = body.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match parts.next() {
        Some(frac) => !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order_numbers() {
        let mut names = vec!["img10.png", "img2.png", "img1.png"];
        names.sort_by_key(|n| natural_key(n));
        assert_eq!(names, vec!["img1.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn test_natural_order_case_insensitive() {
        let mut names = vec!["Beta.png", "alpha.png"];
        names.sort_by_key(|n| natural_key(n));
        assert_eq!(names, vec!["alpha.png", "Beta.png"]);
    }

    #[test]
    fn test_strip_variant_suffix() {
        assert_eq!(strip_variant_suffix("photo_1.5x.png"), "photo.png");
        assert_eq!(strip_variant_suffix("photo_2x.png"), "photo.png");
        assert_eq!(strip_variant_suffix("photo.png"), "photo.png");
    }

    #[test]
    fn test_strip_leaves_non_zoom_underscores() {
        assert_eq!(strip_variant_suffix("photo_x.png"), "photo_x.png");
        assert_eq!(strip_variant_suffix("photo_1..5x.png"), "photo_1..5x.png");
        assert_eq!(strip_variant_suffix("my_photo.png"), "my_photo.png");
        assert_eq!(strip_variant_suffix("photo_1.5y.png"), "photo_1.5y.png");
    }

    #[test]
    fn test_zoom_suffix_round_trip() {
        for zoom in [1.1_f32, 1.5, 2.0, 3.7, 10.0] {
            let saved = format!("shot{}{}", zoom_suffix(zoom), ".png");
            assert_eq!(strip_variant_suffix(&saved), "shot.png");
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("photo.png"), ("photo", ".png"));
        assert_eq!(split_name("archive.tar.png"), ("archive.tar", ".png"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
    }
}
