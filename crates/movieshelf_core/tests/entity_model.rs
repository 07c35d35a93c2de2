use movieshelf_core::{Entity, Movie, ObjectId, ObjectIdParseError, Recipe, Review};

#[test]
fn new_entities_get_distinct_ids_of_their_kind() {
    let first = Movie::new("Heat");
    let second = Movie::new("Heat");

    assert_ne!(first.id(), second.id());
    assert!(!first.id().key().is_nil());
    assert_eq!(first.id().entity(), Movie::ENTITY_NAME);
    assert_eq!(Review::new("t", "x").id().entity(), Review::ENTITY_NAME);
    assert_eq!(Recipe::new("r").id().entity(), Recipe::ENTITY_NAME);
}

#[test]
fn review_for_movie_points_at_movie() {
    let movie = Movie::new("Ronin");
    let mut review = Review::for_movie(&movie, "Car chases", "Best in class.");

    assert_eq!(review.movie_id(), Some(movie.id()));
    assert!(review.published_at > 0);

    review.set_movie(None);
    assert_eq!(review.movie_id(), None);
}

#[test]
fn object_id_string_form_round_trips() {
    let movie = Movie::new("Collateral");
    let text = movie.id().to_string();

    assert!(text.starts_with("movies/"));
    assert_eq!(text.parse::<ObjectId>().unwrap(), movie.id());
}

#[test]
fn object_id_parse_rejects_garbage() {
    assert!(matches!(
        "movies".parse::<ObjectId>(),
        Err(ObjectIdParseError::Malformed(_))
    ));
    assert!(matches!(
        "movies/not-a-uuid".parse::<ObjectId>(),
        Err(ObjectIdParseError::Malformed(_))
    ));
}

#[test]
fn review_serializes_with_string_ids() {
    let movie = Movie::new("Thief");
    let review = Review::for_movie(&movie, "Neon", "Moody.");

    let json = serde_json::to_value(&review).unwrap();
    assert_eq!(json["id"], review.id().to_string());
    assert_eq!(json["movie"], movie.id().to_string());
    assert_eq!(json["title"], "Neon");

    let decoded: Review = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, review);
}

#[test]
fn movie_columns_match_values() {
    let movie = Movie::new("Manhunter");
    assert_eq!(movie.to_values().unwrap().len(), Movie::COLUMNS.len());

    let recipe = Recipe::new("Chili");
    assert_eq!(recipe.to_values().unwrap().len(), Recipe::COLUMNS.len());
}

#[test]
fn review_reference_clears_only_for_its_movie() {
    let movie = Movie::new("Stalker");
    let other = Movie::new("Solaris");
    let mut review = Review::for_movie(&movie, "Zone", "Slow and strange.");

    assert_eq!(review.references(), vec![movie.id()]);
    assert!(movie.references().is_empty());

    review.clear_reference(&other.id());
    assert_eq!(review.movie_id(), Some(movie.id()));

    review.clear_reference(&movie.id());
    assert_eq!(review.movie_id(), None);
    assert!(review.references().is_empty());
}
