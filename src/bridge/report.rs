//! Human-readable rendering of an enriched result.

use std::fmt::Write;

use colored::Colorize;

use super::enricher::{EnrichedPair, EnrichedResult};

/// Renders every pair as a heading line followed by one line per film and a
/// blank separator line:
///
/// ```text
/// Cheh Chang involved as director and David Chiang involved as actor in 2 films:
/// Vengeance (1970) with rating 7.2
/// Xiao sha xing (1970) with rating 7.2
/// ```
///
/// With `styled`, headings are bold and placeholders for unresolved ids are
/// highlighted.
pub fn render_report(result: &EnrichedResult, styled: bool) -> String {
    let mut out = String::new();
    for pair in &result.pairs {
        render_pair(&mut out, pair, styled);
    }
    out
}

fn render_pair(out: &mut String, pair: &EnrichedPair, styled: bool) {
    let [a, b] = &pair.members;
    let heading = format!(
        "{} involved as {} and {} involved as {} in {} films:",
        a.name,
        a.role,
        b.name,
        b.role,
        pair.film_count()
    );
    if styled {
        let _ = writeln!(out, "{}", heading.bold());
    } else {
        let _ = writeln!(out, "{}", heading);
    }

    for film in &pair.films {
        if styled && film.display.starts_with("<unknown") {
            let _ = writeln!(out, "{}", film.display.yellow());
        } else {
            let _ = writeln!(out, "{}", film.display);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::enricher::{EnrichedFilm, EnrichedMember};
    use crate::types::Role;

    #[test]
    fn test_render_plain_report() {
        let result = EnrichedResult {
            pairs: vec![EnrichedPair {
                members: [
                    EnrichedMember {
                        person_id: "nm0151653".into(),
                        name: "Cheh Chang".into(),
                        role: Role::Director,
                    },
                    EnrichedMember {
                        person_id: "nm0156955".into(),
                        name: "David Chiang".into(),
                        role: Role::Actor,
                    },
                ],
                films: vec![
                    EnrichedFilm {
                        film_id: "tt0065450".into(),
                        display: "Vengeance (1970) with rating 7.2".into(),
                    },
                    EnrichedFilm {
                        film_id: "tt0066587".into(),
                        display: "Xiao sha xing (1970) with rating 7.2".into(),
                    },
                ],
                unresolved: vec![],
            }],
        };

        let text = render_report(&result, false);
        assert_eq!(
            text,
            "Cheh Chang involved as director and David Chiang involved as actor in 2 films:\n\
             Vengeance (1970) with rating 7.2\n\
             Xiao sha xing (1970) with rating 7.2\n\n"
        );
    }

    #[test]
    fn test_render_empty_result() {
        assert_eq!(render_report(&EnrichedResult::default(), false), "");
    }
}
