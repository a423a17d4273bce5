use regex::Regex;
use std::sync::OnceLock;

static CAMERA_STEM: OnceLock<Regex> = OnceLock::new();

// Alternatives in priority order; at a given position the first one that matches wins.
// ASCII classes are spelled out because `\d`/`\w` are Unicode-aware in `regex`.
const CAMERA_STEM_PATTERN: &str = r"(?x)
    # date followed by a time of day, as in camera or app generated names
    (?P<stamp>\s?[0-9]{4}[^0-9]?[0-9]{2}[^0-9]?[0-9]{2}(?:[^0-9-]?[0-9]{2}){2,3})
    # DCF file stem: four characters then a sequence number (DSCF1234, IMG_0001)
  | ^[A-Za-z0-9_]{4}[0-9]+
    # DCF directory stem: directory number then five characters (100NIKON)
  | ^[0-9]{3}[A-Za-z0-9_]{5}
    # date, or date range with the end year and month optional (2016.01.01-02.02)
  | \s?[0-9]{4}[^A-Za-z0-9_]?[0-9]{2}[^A-Za-z0-9_]?[0-9]{2}
        (?:-(?:(?:[0-9]{4}[^A-Za-z0-9_]?)?[0-9]{2}[^A-Za-z0-9_]?)?[0-9]{2})?
";

fn camera_stem() -> &'static Regex {
    CAMERA_STEM
        .get_or_init(|| Regex::new(CAMERA_STEM_PATTERN).expect("camera stem pattern is valid"))
}

/// Strips camera generated stems and date stamps from a file or directory name.
///
/// What is left is the part a person typed, extension included. A name without any
/// recognised stem is returned unchanged.
///
/// A single space between a date stamp and a title starting with a letter or digit is the
/// one `make_new_file_name` inserted, so it goes together with the stamp.
pub fn extract_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut kept_from = 0;
    for caps in camera_stem().captures_iter(name) {
        let Some(stem) = caps.get(0) else {
            continue;
        };
        title.push_str(&name[kept_from..stem.start().max(kept_from)]);
        kept_from = stem.end().max(kept_from);
        if caps.name("stamp").is_some() {
            kept_from += joining_space_len(&name[kept_from..]);
        }
    }
    title.push_str(&name[kept_from..]);
    title
}

fn joining_space_len(rest: &str) -> usize {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(' '), Some(next)) if next.is_alphanumeric() => 1,
        _ => 0,
    }
}

/// Trailing `.ext` of a title, or an empty string when it has none.
pub fn title_extension(title: &str) -> &str {
    match title.rfind('.') {
        Some(pos) if pos + 1 < title.len() => &title[pos..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_title, title_extension};

    #[test]
    fn strips_dcf_file_stems() {
        assert_eq!(
            extract_title("DSCF1234 some fancy title eg. żółć.jpg"),
            " some fancy title eg. żółć.jpg"
        );
        assert_eq!(extract_title("DSCF0000 - sth.JPG"), " - sth.JPG");
        assert_eq!(extract_title("IMG_1234.jpg"), ".jpg");
        assert_eq!(extract_title("DCIM1234.jpg"), ".jpg");
    }

    #[test]
    fn strips_dcf_directory_stems() {
        assert_eq!(
            extract_title("105NIKON an extraordinarily nice event"),
            " an extraordinarily nice event"
        );
        assert_eq!(extract_title("100TEST_-abc"), "-abc");
        assert_eq!(extract_title("100TEST_"), "");
    }

    #[test]
    fn keeps_names_without_camera_stems() {
        assert_eq!(extract_title("Hi guys.JPG"), "Hi guys.JPG");
        assert_eq!(extract_title("bździągwa"), "bździągwa");
        assert_eq!(extract_title("1.jpg"), "1.jpg");
        assert_eq!(extract_title("a mix"), "a mix");
    }

    #[test]
    fn strips_date_time_stamps() {
        assert_eq!(extract_title("2017-01-08_13.18.27.jpg"), ".jpg");
        assert_eq!(extract_title("2016.01.01_00.00.00 blah.jpg"), "blah.jpg");
        assert_eq!(extract_title("20160101 120000 x.jpg"), "x.jpg");
        assert_eq!(extract_title("2016.01.01_00.00.00 - sth.JPG"), " - sth.JPG");
        assert_eq!(extract_title("2016.01.01_00.00.00  two spaces"), "  two spaces");
    }

    #[test]
    fn strips_dates_and_date_ranges() {
        assert_eq!(extract_title("2016.01.01-02 trip"), " trip");
        assert_eq!(extract_title("2016.01.01-02.02 teścior"), " teścior");
        assert_eq!(extract_title("2016.12.31-2017.01.01"), "");
        assert_eq!(extract_title("Party 2016-01-01"), "Party");
    }

    #[test]
    fn extraction_is_idempotent_on_plain_titles() {
        for name in ["Hi guys.JPG", " - sth.JPG", "a mix", "bździągwa", ".jpg"] {
            let once = extract_title(name);
            assert_eq!(extract_title(&once), once);
        }
    }

    #[test]
    fn title_extension_keeps_last_suffix() {
        assert_eq!(title_extension(" sth.jpg"), ".jpg");
        assert_eq!(title_extension("archive.tar.gz"), ".gz");
        assert_eq!(title_extension("no extension"), "");
        assert_eq!(title_extension("trailing."), "");
    }
}
