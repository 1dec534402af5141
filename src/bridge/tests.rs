use super::*;
use crate::config::CostarConfig;
use crate::error::{CostarError, ReferenceKind};
use crate::pairing::{CollaboratorPair, Credit, FilmWhitelist, RankedPair};
use crate::query::{FilmFilter, PairQuery};
use crate::source::{FilmCatalog, PersonIndex};
use crate::types::{CreditRecord, FilmRecord, PersonRecord, Role};
use std::io::Cursor;

const FILMS: &str = "tconst\tstartYear\tprimaryTitle\taverageRating\tnumVotes\n\
    tt0065450\t1970\tVengeance\t7.2\t1500\n\
    tt0066587\t1970\tXiao sha xing\t7.2\t300\n\
    tt0067026\t1971\tDuel of the Iron Fist\t7.1\t800\n\
    tt0068815\t1972\tLone Wolf and Cub: Sword of Vengeance\t7.9\t9000\n\
    tt0068816\t1972\tLone Wolf and Cub: Baby Cart at the River Styx\t8.0\t7000\n\
    tt0070000\t1973\tA Forgettable Film\t3.1\t50\n";

// Runs are contiguous per film but not sorted. Two rows are malformed: an
// unknown category, and a row with a stray extra field mid-film.
const CREDITS: &str = "tconst\tnconst\tcategory\n\
    tt0068815\tnm0423663\tactor\n\
    tt0068815\tnm0593014\tdirector\n\
    tt0065450\tnm0151653\tdirector\n\
    tt0065450\tnm0156955\tactor\n\
    tt0065450\tnm0156955\tactor\textra\n\
    tt0065450\tnm0000001\twriter\n\
    tt0066587\tnm0151653\tdirector\n\
    tt0066587\tnm0156955\tactor\n\
    tt0066587\tnm0999999\tcomposer\n\
    tt0070000\tnm0151653\tdirector\n\
    tt0070000\tnm0156955\tactor\n\
    tt0067026\tnm0156955\tactor\n\
    tt0067026\tnm0151653\tdirector\n\
    tt0068816\tnm0593014\tdirector\n\
    tt0068816\tnm0423663\tactor\n";

const PERSONS: &str = "nconst\tprimaryName\n\
    nm0000001\tSomeone Else\n\
    nm0151653\tCheh Chang\n\
    nm0156955\tDavid Chiang\n\
    nm0423663\tTomisaburo Wakayama\n\
    nm0593014\tKenji Misumi\n";

fn query(result_count: usize) -> PairQuery {
    PairQuery {
        pattern_choice: 4,
        filter: FilmFilter {
            min_rating: 7.0,
            max_rating: 10.0,
            min_year: 1960,
            max_year: 1980,
        },
        result_count,
    }
}

fn small_batches() -> CostarConfig {
    CostarConfig {
        batch_size_rows: 3,
        ..CostarConfig::default()
    }
}

fn search(result_count: usize) -> PairSearch {
    run_pair_search(
        &query(result_count),
        &small_batches(),
        Cursor::new(FILMS),
        Cursor::new(CREDITS),
        Cursor::new(PERSONS),
    )
    .unwrap()
}

#[test]
fn test_end_to_end_search_ranks_and_enriches() {
    let outcome = search(2);

    assert_eq!(outcome.films_in_window, 5);
    assert_eq!(outcome.distinct_pairs, 2);
    assert_eq!(outcome.stats.malformed_skipped, 2);
    assert_eq!(outcome.stats.records_outside_whitelist, 2);
    assert!(outcome.shortfall.is_none());

    let pairs = &outcome.result.pairs;
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].members[0].name, "Cheh Chang");
    assert_eq!(pairs[0].members[0].role, Role::Director);
    assert_eq!(pairs[0].members[1].name, "David Chiang");
    assert_eq!(pairs[0].film_count(), 3);
    assert_eq!(pairs[0].films[0].display, "Vengeance (1970) with rating 7.2");
    assert_eq!(pairs[1].film_count(), 2);
    assert_eq!(
        pairs[1].films[1].display,
        "Lone Wolf and Cub: Baby Cart at the River Styx (1972) with rating 8.0"
    );
    assert_eq!(outcome.result.unresolved_count(), 0);
}

#[test]
fn test_batch_size_does_not_change_results() {
    let small = search(2);
    let large = run_pair_search(
        &query(2),
        &CostarConfig::default(),
        Cursor::new(FILMS),
        Cursor::new(CREDITS),
        Cursor::new(PERSONS),
    )
    .unwrap();
    assert_eq!(small.result, large.result);
    assert!(small.stats.batches > large.stats.batches);
}

#[test]
fn test_shortfall_is_reported_not_fatal() {
    let outcome = search(5);
    assert_eq!(
        outcome.shortfall,
        Some(Shortfall {
            requested: 5,
            available: 2
        })
    );
    assert_eq!(outcome.result.pairs.len(), 2);
}

#[test]
fn test_invalid_query_is_rejected_before_reading() {
    let mut bad = query(2);
    bad.pattern_choice = 0;
    // The readers are empty; validation must fail first.
    let err = run_pair_search(
        &bad,
        &CostarConfig::default(),
        Cursor::new(""),
        Cursor::new(""),
        Cursor::new(""),
    )
    .unwrap_err();
    assert!(matches!(err, CostarError::InvalidChoice(0)));
}

#[test]
fn test_enrich_degrades_unknown_ids() {
    let pattern = pattern_for(5).unwrap();
    let pair = CollaboratorPair::try_new(
        Credit::new("nm1", Role::Actress),
        Credit::new("nm2", Role::Director),
        &pattern,
    )
    .unwrap();
    let selected = vec![RankedPair {
        pair,
        films: vec!["tt1".into(), "tt2".into()],
    }];

    let films: FilmCatalog = vec![FilmRecord {
        film_id: "tt1".into(),
        year: 1999,
        title: "Known".into(),
        average_rating: 8.1,
        vote_count: 10,
    }]
    .into_iter()
    .collect();
    let persons: PersonIndex = vec![PersonRecord {
        person_id: "nm1".into(),
        name: "Known Person".into(),
    }]
    .into_iter()
    .collect();

    let result = enrich(&selected, &films, &persons);
    let pair = &result.pairs[0];

    assert_eq!(pair.members[0].name, "Known Person");
    assert_eq!(pair.members[1].name, "<unknown person nm2>");
    assert_eq!(pair.films[0].display, "Known (1999) with rating 8.1");
    assert_eq!(pair.films[1].display, "<unknown film tt2>");

    let errors: Vec<CostarError> = pair.errors().collect();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(CostarError::is_recoverable));
    assert!(matches!(
        &errors[0],
        CostarError::UnresolvedReference { kind: ReferenceKind::Person, id } if id == "nm2"
    ));
}

#[test]
fn test_referenced_people_and_report_agree() {
    let records = vec![
        CreditRecord::new("F1", "P1", Role::Producer),
        CreditRecord::new("F1", "P2", Role::Director),
    ];
    let whitelist: FilmWhitelist = ["F1"].into_iter().collect();
    let map = aggregate(records, pattern_for(6).unwrap(), &whitelist);
    let selected = select_top(&map, 1).unwrap();

    let people = referenced_people(&selected);
    assert_eq!(people.into_iter().collect::<Vec<_>>(), vec!["P1", "P2"]);

    let films: FilmCatalog = std::iter::empty::<FilmRecord>().collect();
    let persons: PersonIndex = std::iter::empty::<PersonRecord>().collect();
    let text = render_report(&enrich(&selected, &films, &persons), false);
    assert!(text.starts_with("<unknown person P1> involved as producer and <unknown person P2> involved as director in 1 films:"));
}
