use crate::enrich::Profile;
use console::Style;
use reviewer_scoring::ScoredReviewer;
use serde::Serialize;
use std::fmt::Write;

const SEPARATOR: &str = "\n---------------------\n\n";

/// One ranked reviewer ready for output
pub struct Entry<'a> {
    pub reviewer: &'a ScoredReviewer,
    pub relative_score: f64,
    pub profile: Option<Profile>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    reviewer: &'a ScoredReviewer,
    relative_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<&'a Profile>,
}

pub fn render_json(entries: &[Entry<'_>]) -> serde_json::Result<String> {
    let rows: Vec<JsonEntry<'_>> = entries
        .iter()
        .map(|e| JsonEntry {
            reviewer: e.reviewer,
            relative_score: e.relative_score,
            profile: e.profile.as_ref(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub struct TextRenderer {
    handle: Style,
    languages: Style,
    counter: Style,
}

impl TextRenderer {
    pub fn new(colors: bool) -> Self {
        Self {
            handle: Style::new().red().bold().force_styling(colors),
            languages: Style::new().black().bright().bold().force_styling(colors),
            counter: Style::new().green().bold().force_styling(colors),
        }
    }

    pub fn render(&self, entries: &[Entry<'_>]) -> String {
        let mut out = String::new();
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                out.push_str(SEPARATOR);
            }
            self.render_entry(&mut out, entry);
        }
        out
    }

    // Writing into a String cannot fail.
    fn render_entry(&self, out: &mut String, entry: &Entry<'_>) {
        let s = entry.reviewer;
        let r = &s.record;

        let _ = writeln!(
            out,
            "https://github.com/{}: / score: {:.3} (total {:.2})",
            self.handle.apply_to(&r.username),
            entry.relative_score,
            s.total_score
        );
        let _ = writeln!(out, "areas: {}", one_line(r.topic_areas.as_deref().unwrap_or("")));

        let _ = write!(
            out,
            "languages: {}",
            self.languages
                .apply_to(one_line(r.preferred_languages.as_deref().unwrap_or("")))
        );
        if let Some(other) = r.other_languages.as_deref() {
            let _ = write!(out, " / {}", self.languages.apply_to(one_line(other)));
        }
        out.push('\n');

        let _ = write!(out, "matched: {}", s.matched_keywords.join(", "));
        if !s.matched_languages.is_empty() {
            let _ = write!(out, " / {}", s.matched_languages.join(", "));
        }
        out.push('\n');

        let _ = writeln!(
            out,
            "active: {} / all time: {} / last year: {} / last quarter: {}",
            self.counter.apply_to(r.active_reviews),
            self.counter.apply_to(r.review_count_all_time),
            self.counter.apply_to(r.review_count_last_year),
            self.counter.apply_to(r.review_count_last_quarter),
        );

        if let Some(profile) = &entry.profile {
            render_profile(out, profile);
        }
    }
}

fn render_profile(out: &mut String, profile: &Profile) {
    if let Some(bio) = profile.bio.as_deref() {
        let _ = writeln!(out, "bio: {}", one_line(bio));
    }
    if profile.repositories.is_empty() {
        return;
    }
    out.push_str("repos:\n");
    for repo in &profile.repositories {
        let _ = write!(out, "  {}", repo.name);
        if let Some(language) = repo.language.as_deref() {
            let _ = write!(out, " ({language})");
        }
        if let Some(description) = repo.description.as_deref() {
            let _ = write!(out, ": {}", one_line(description));
        }
        out.push('\n');
    }
}

fn one_line(text: &str) -> String {
    text.replace('\r', "").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::ShowcaseRepo;
    use pretty_assertions::assert_eq;
    use reviewer_roster::ReviewerRecord;

    fn reviewer() -> ScoredReviewer {
        let mut record = ReviewerRecord::new("ada")
            .preferred_languages("Rust\nC")
            .topic_areas("parsing,\ncompilers")
            .active_reviews(1);
        record.review_count_all_time = 7;
        record.review_count_last_year = 3;
        ScoredReviewer {
            record,
            keyword_score: 10.0,
            language_score: 10.0,
            total_score: 14.0,
            matched_keywords: vec!["parsing".into()],
            matched_languages: vec!["Rust".into()],
        }
    }

    #[test]
    fn plain_text_layout() {
        let s = reviewer();
        let entries = [Entry {
            reviewer: &s,
            relative_score: 1.0,
            profile: None,
        }];

        let text = TextRenderer::new(false).render(&entries);

        assert_eq!(
            text,
            "https://github.com/ada: / score: 1.000 (total 14.00)\n\
             areas: parsing, compilers\n\
             languages: Rust C\n\
             matched: parsing / Rust\n\
             active: 1 / all time: 7 / last year: 3 / last quarter: 0\n"
        );
    }

    #[test]
    fn profile_and_separator() {
        let s = reviewer();
        let mut other = reviewer();
        other.record.other_languages = Some("Go".into());
        let profile = Profile {
            name: None,
            bio: Some("I like\r\ngrammars".into()),
            repositories: vec![ShowcaseRepo {
                name: "lexer".into(),
                description: Some("fast".into()),
                language: Some("Rust".into()),
            }],
        };
        let entries = [
            Entry {
                reviewer: &s,
                relative_score: 1.0,
                profile: Some(profile),
            },
            Entry {
                reviewer: &other,
                relative_score: 1.0,
                profile: None,
            },
        ];

        let text = TextRenderer::new(false).render(&entries);

        assert!(text.contains("bio: I like grammars\nrepos:\n  lexer (Rust): fast\n"));
        assert!(text.contains(SEPARATOR));
        assert!(text.contains("languages: Rust C / Go\n"));
    }

    #[test]
    fn colors_are_optional() {
        let s = reviewer();
        let entries = [Entry {
            reviewer: &s,
            relative_score: 1.0,
            profile: None,
        }];

        assert!(!TextRenderer::new(false).render(&entries).contains('\u{1b}'));
        assert!(TextRenderer::new(true).render(&entries).contains('\u{1b}'));
    }

    #[test]
    fn json_rows_are_flat() {
        let s = reviewer();
        let entries = [Entry {
            reviewer: &s,
            relative_score: 0.5,
            profile: None,
        }];

        let value: serde_json::Value = serde_json::from_str(&render_json(&entries).unwrap()).unwrap();

        assert_eq!(value[0]["username"], "ada");
        assert_eq!(value[0]["total_score"], 14.0);
        assert_eq!(value[0]["relative_score"], 0.5);
        assert_eq!(value[0]["matched_languages"][0], "Rust");
        assert!(value[0].get("profile").is_none());
        assert!(value[0].get("random_tiebreak").is_none());
    }
}
