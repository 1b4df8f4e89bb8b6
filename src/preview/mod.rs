//! Repository preview card: language ranking, layout and rasterization.

pub mod layout;
pub mod palette;
mod raster;

pub use layout::{HEIGHT, Scene, WIDTH, compose};
pub use raster::render_png;

use crate::error::RenderError;
use crate::github::{LanguageBytes, RepositoryMetadata};

pub const MAX_LANGUAGES: usize = 4;

/// Languages to show on the card.
///
/// Ranked by byte count when the languages call produced data; otherwise the
/// repository's primary language alone, or nothing.
pub fn top_languages(repo: &RepositoryMetadata, languages: Option<&LanguageBytes>) -> Vec<String> {
    match languages {
        Some(langs) if !langs.is_empty() => langs.top(MAX_LANGUAGES),
        _ => repo.language.iter().cloned().collect(),
    }
}

/// Compose and rasterize a PNG preview for `repo`.
pub fn render(
    repo: &RepositoryMetadata,
    languages: Option<&LanguageBytes>,
    date_format: &str,
) -> Result<Vec<u8>, RenderError> {
    let ranked = top_languages(repo, languages);
    let scene = compose(repo, &ranked, date_format);
    render_png(&scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::sample_repository;

    fn bytes(pairs: &[(&str, u64)]) -> LanguageBytes {
        LanguageBytes(pairs.iter().map(|(n, b)| (n.to_string(), *b)).collect())
    }

    #[test]
    fn ranks_at_most_four_by_bytes() {
        let repo = sample_repository();
        let langs = bytes(&[
            ("CSS", 10),
            ("TypeScript", 9000),
            ("HTML", 50),
            ("Shell", 3),
            ("JavaScript", 700),
        ]);
        assert_eq!(
            top_languages(&repo, Some(&langs)),
            vec!["TypeScript", "JavaScript", "HTML", "CSS"]
        );
    }

    #[test]
    fn failed_languages_fall_back_to_primary() {
        let repo = sample_repository();
        assert_eq!(top_languages(&repo, None), vec!["TypeScript"]);
        assert_eq!(top_languages(&repo, Some(&bytes(&[]))), vec!["TypeScript"]);
    }

    #[test]
    fn no_language_data_at_all_is_empty() {
        let mut repo = sample_repository();
        repo.language = None;
        assert!(top_languages(&repo, None).is_empty());
    }

    #[test]
    fn render_yields_fixed_size_png() {
        let png = render(&sample_repository(), None, "%-m/%-d/%Y").unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    }
}
