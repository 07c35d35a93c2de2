use movieshelf_core::{
    BaseModel, ContextProvider, Movie, MovieService, NewMovie, Review, ReviewService,
};

#[test]
fn add_review_for_movie_links_review_to_movie() {
    let provider = ContextProvider::in_memory().unwrap();
    let movies = MovieService::new(&provider);
    let reviews = ReviewService::new(&provider);

    let movie_id = movies
        .add_movie(&NewMovie {
            title: "  Inception ".to_string(),
            director: Some("Christopher Nolan".to_string()),
            ..NewMovie::default()
        })
        .unwrap();

    let review_id = reviews
        .add_review_for_movie(&movie_id, "Dreamy", "Layers on layers.")
        .unwrap()
        .unwrap();

    let listed = reviews.reviews_for_movie(&movie_id);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), review_id);
    assert_eq!(listed[0].title, "Dreamy");

    let ctx = provider.current_context();
    let movie = listed[0].movie(&ctx).unwrap();
    assert_eq!(movie.title, "Inception");
    assert_eq!(movie.id(), movie_id);
}

#[test]
fn add_review_for_unknown_movie_writes_nothing() {
    let provider = ContextProvider::in_memory().unwrap();
    let reviews = ReviewService::new(&provider);
    let missing = Movie::new("Missing");

    let result = reviews
        .add_review_for_movie(&missing.id(), "Lost", "Where is it?")
        .unwrap();

    assert_eq!(result, None);
    assert!(reviews.reviews_for_movie(&missing.id()).is_empty());
    assert!(!provider.current_context().has_changes());
}

#[test]
fn add_review_with_review_id_is_rejected() {
    let provider = ContextProvider::in_memory().unwrap();
    let movies = MovieService::new(&provider);
    let reviews = ReviewService::new(&provider);

    let movie_id = movies
        .add_movie(&NewMovie {
            title: "Heat".to_string(),
            ..NewMovie::default()
        })
        .unwrap();
    let review_id = reviews
        .add_review_for_movie(&movie_id, "Tense", "Great shootout.")
        .unwrap()
        .unwrap();

    let result = reviews
        .add_review_for_movie(&review_id, "Wrong", "Not a movie id.")
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn reviews_are_listed_newest_first() {
    let provider = ContextProvider::in_memory().unwrap();
    let movies = MovieService::new(&provider);
    let reviews = ReviewService::new(&provider);

    let movie_id = movies
        .add_movie(&NewMovie {
            title: "Zodiac".to_string(),
            ..NewMovie::default()
        })
        .unwrap();

    {
        let mut ctx = provider.current_context();
        let movie = Movie::by_id(&ctx, &movie_id).unwrap();
        let mut older = Review::for_movie(&movie, "Older", "text");
        older.published_at = 1_000;
        let mut newer = Review::for_movie(&movie, "Newer", "text");
        newer.published_at = 2_000;
        older.save(&mut ctx);
        newer.save(&mut ctx);
    }

    let titles: Vec<_> = reviews
        .reviews_for_movie(&movie_id)
        .into_iter()
        .map(|review| review.title)
        .collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[test]
fn delete_movie_reports_whether_it_existed() {
    let provider = ContextProvider::in_memory().unwrap();
    let movies = MovieService::new(&provider);

    let movie_id = movies
        .add_movie(&NewMovie {
            title: "Se7en".to_string(),
            director: Some("   ".to_string()),
            ..NewMovie::default()
        })
        .unwrap();
    assert_eq!(movies.all_movies()[0].director, None);

    assert!(movies.delete_movie(&movie_id).unwrap());
    assert!(!movies.delete_movie(&movie_id).unwrap());
    assert!(movies.all_movies().is_empty());
}

#[test]
fn add_movie_with_blank_title_fails_and_leaves_nothing_pending() {
    let provider = ContextProvider::in_memory().unwrap();
    let movies = MovieService::new(&provider);

    assert!(movies.add_movie(&NewMovie::default()).is_err());
    assert!(movies.all_movies().is_empty());
    assert!(!provider.current_context().has_changes());
}
