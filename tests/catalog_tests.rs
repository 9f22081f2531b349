use std::collections::HashSet;

use chrono::{Datelike, Utc};
use media_catalog_server::{
    create_in_memory_app, CatalogError, CatalogService, GenreDraft, TitleDraft, TitleKind,
    TitleQuery, ValidationError,
};
use uuid::Uuid;

fn title_draft(name: &str, kind: TitleKind, year: i32, genres: HashSet<Uuid>) -> TitleDraft {
    TitleDraft {
        name: name.to_string(),
        kind,
        release_year: year,
        synopsis: None,
        average_rating: None,
        genres,
    }
}

#[tokio::test]
async fn test_title_genre_round_trip() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let action = catalog
        .create_genre(GenreDraft {
            name: "Action".to_string(),
        })
        .await
        .unwrap();
    let drama = catalog
        .create_genre(GenreDraft {
            name: "Drama".to_string(),
        })
        .await
        .unwrap();

    let saved = catalog
        .create_title(title_draft(
            "Heat",
            TitleKind::Movie,
            1995,
            HashSet::from([action.id, drama.id]),
        ))
        .await
        .unwrap();

    // Reloading yields exactly the same genre set, order-independent
    let reloaded = catalog.get_title(saved.id).await.unwrap();
    assert_eq!(reloaded.genres, HashSet::from([action.id, drama.id]));
    assert_eq!(reloaded.name, "Heat");
    assert_eq!(reloaded.created_at, saved.created_at);
}

#[tokio::test]
async fn test_title_requires_genre_and_valid_year() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let genre = catalog
        .create_genre(GenreDraft {
            name: "Sci-Fi".to_string(),
        })
        .await
        .unwrap();

    // Empty genre set is rejected
    let err = catalog
        .create_title(title_draft("Dune", TitleKind::Movie, 2021, HashSet::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::NoGenreAssigned)
    ));

    // Next year fails, current year passes
    let current_year = Utc::now().year();
    let err = catalog
        .create_title(title_draft(
            "Dune Part Three",
            TitleKind::Movie,
            current_year + 1,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::FutureReleaseYear { .. })
    ));

    catalog
        .create_title(title_draft(
            "Dune Part Two",
            TitleKind::Movie,
            current_year,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap();

    // Nothing was persisted for the rejected drafts
    assert_eq!(catalog.list_titles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_title_name_bounds() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let genre = catalog
        .create_genre(GenreDraft {
            name: "Drama".to_string(),
        })
        .await
        .unwrap();

    let err = catalog
        .create_title(title_draft(
            "X",
            TitleKind::Movie,
            2000,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::TitleNameLength { .. })
    ));

    let err = catalog
        .create_title(title_draft(
            &"x".repeat(151),
            TitleKind::Movie,
            2000,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::TitleNameLength { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_genre_name_rejected() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    catalog
        .create_genre(GenreDraft {
            name: "Thriller".to_string(),
        })
        .await
        .unwrap();

    let err = catalog
        .create_genre(GenreDraft {
            name: "Thriller".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::DuplicateGenreName(_))
    ));

    // Name matching is case-sensitive: a different casing is a new genre
    catalog
        .create_genre(GenreDraft {
            name: "thriller".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_genre_delete_blocked_while_referenced() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let genre = catalog
        .create_genre(GenreDraft {
            name: "Horror".to_string(),
        })
        .await
        .unwrap();
    let title = catalog
        .create_title(title_draft(
            "Alien",
            TitleKind::Movie,
            1979,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap();

    let err = catalog.delete_genre(genre.id).await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::GenreInUse {
            referencing_titles: 1,
            ..
        }
    ));

    // After the reference is gone the delete succeeds
    catalog.delete_title(title.id).await.unwrap();
    catalog.delete_genre(genre.id).await.unwrap();
    assert!(catalog.list_genres().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_filters_are_conjunctive() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let scifi = catalog
        .create_genre(GenreDraft {
            name: "Sci-Fi".to_string(),
        })
        .await
        .unwrap();
    let drama = catalog
        .create_genre(GenreDraft {
            name: "Drama".to_string(),
        })
        .await
        .unwrap();

    let dune = catalog
        .create_title(title_draft(
            "Dune",
            TitleKind::Movie,
            2021,
            HashSet::from([scifi.id]),
        ))
        .await
        .unwrap();
    catalog
        .create_title(title_draft(
            "The Crown",
            TitleKind::Series,
            2016,
            HashSet::from([drama.id]),
        ))
        .await
        .unwrap();

    // Movie from 2021 matches Dune
    let found = catalog
        .search_titles(TitleQuery {
            kind: Some(TitleKind::Movie),
            year: Some(2021),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, dune.id);

    // Drama membership does not match Dune
    let found = catalog
        .search_titles(TitleQuery {
            genre_id: Some(drama.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_ne!(found[0].id, dune.id);

    // Name match is a case-insensitive substring
    let found = catalog
        .search_titles(TitleQuery {
            name_pattern: Some("crow".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "The Crown");

    // No filters returns everything, newest first
    let all = catalog.search_titles(TitleQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].created_at >= all[1].created_at);
}

#[tokio::test]
async fn test_update_keeps_creation_time() {
    let services = create_in_memory_app().await.unwrap();
    let catalog = &services.catalog_service;

    let genre = catalog
        .create_genre(GenreDraft {
            name: "Comedy".to_string(),
        })
        .await
        .unwrap();
    let saved = catalog
        .create_title(title_draft(
            "The Office",
            TitleKind::Series,
            2005,
            HashSet::from([genre.id]),
        ))
        .await
        .unwrap();

    let mut draft = title_draft(
        "The Office (US)",
        TitleKind::Series,
        2005,
        HashSet::from([genre.id]),
    );
    draft.average_rating = Some(8.9);
    let updated = catalog.update_title(saved.id, draft).await.unwrap();

    assert_eq!(updated.name, "The Office (US)");
    assert_eq!(updated.average_rating, Some(8.9));
    assert_eq!(updated.created_at, saved.created_at);
}
