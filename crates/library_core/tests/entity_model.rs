use library_core::{Author, Book, BookGenre, EntityValidationError, UNASSIGNED_ID};

#[test]
fn new_records_start_unassigned() {
    let author = Author::new("Jane", "Austen");
    assert_eq!(author.id, UNASSIGNED_ID);
    assert!(!author.is_persisted());

    let book = Book::new("Emma", author.clone(), 1815, BookGenre::Fiction);
    assert_eq!(book.id, UNASSIGNED_ID);
    assert_eq!(book.author_id(), author.id);
}

#[test]
fn with_id_rejects_non_positive_ids() {
    assert_eq!(
        Author::with_id(0, "Jane", "Austen").unwrap_err(),
        EntityValidationError::InvalidId {
            entity: "author",
            id: 0
        }
    );

    let author = Author::with_id(1, "Jane", "Austen").unwrap();
    assert_eq!(
        Book::with_id(-3, "Emma", author, 1815, BookGenre::Fiction).unwrap_err(),
        EntityValidationError::InvalidId {
            entity: "book",
            id: -3
        }
    );
}

#[test]
fn construction_does_not_validate_lengths() {
    let author = Author::new("x".repeat(80), "Austen");
    assert_eq!(
        author.validate().unwrap_err(),
        EntityValidationError::TooLong {
            entity: "author",
            field: "first_name",
            max: 50,
            actual: 80,
        }
    );
}

#[test]
fn negative_year_is_allowed() {
    let author = Author::with_id(1, "Homer", "of Chios").unwrap();
    let book = Book::new("Iliad", author, -750, BookGenre::Poetry);
    assert!(book.validate().is_ok());
}

#[test]
fn book_serialization_uses_expected_wire_fields() {
    let author = Author::with_id(1, "Jane", "Austen").unwrap();
    let book = Book::with_id(7, "Emma", author, 1815, BookGenre::NonFiction).unwrap();

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["title"], "Emma");
    assert_eq!(json["year"], 1815);
    assert_eq!(json["genre"], "non_fiction");
    assert_eq!(json["author"]["id"], 1);
    assert_eq!(json["author"]["first_name"], "Jane");
    assert_eq!(json["author"]["last_name"], "Austen");

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
}

#[test]
fn serialized_genre_matches_stored_form() {
    for genre in BookGenre::ALL {
        let json = serde_json::to_value(genre).unwrap();
        assert_eq!(json, genre.as_str());
    }
}
