use dbclass::Db;

pub async fn errors(db: &mut Db) {
    // Placeholder without a value
    db.empty_params();
    db.add_param_to_bind("id", 1);
    assert!(
        !db.select("select * from users where id = :id and lastname = :lastname")
            .await
    );
    assert!(
        db.err_message()
            .contains("parameter :lastname was not bound"),
        "Unexpected message: {}",
        db.err_message()
    );
    assert!(db.next_row().is_none());

    // Value without a placeholder
    db.empty_params();
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("unused", 0);
    assert!(!db.select("select * from users where id = :id").await);
    assert!(
        db.err_message()
            .contains("parameter :unused is not defined in the query"),
        "Unexpected message: {}",
        db.err_message()
    );

    // A successful call clears the message
    db.empty_params();
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("lastname", "Lennon");
    assert!(
        db.select("select firstname from users where id = :id and lastname = :lastname")
            .await,
        "{}",
        db.err_message()
    );
    assert_eq!(db.err_message(), "");
    assert_eq!(
        db.next_row()
            .expect("John must be found")
            .get::<String>("firstname")
            .unwrap(),
        "John"
    );

    // Failures reset the previous result
    db.empty_params();
    assert!(db.select("select * from users").await);
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("lastname", "Lennon");
    assert!(!db.update("update users_error set lastname = :lastname where id = :id").await);
    assert!(db.next_row().is_none());
    assert_eq!(db.rows_affected(), 0);

    // Placeholders inside literals and comments are not parameters
    db.empty_params();
    db.add_param_to_bind("id", 1);
    assert!(
        db.select("select ':nope' as quoted, id from users /* :nope */ where id = :id -- :nope")
            .await,
        "{}",
        db.err_message()
    );
    let row = db.next_row().expect("The user 1 must exist");
    assert_eq!(row.get::<String>("quoted").unwrap(), ":nope");

    // Reconnection
    db.disconnect().await;
    assert!(!db.is_connected());
    assert!(!db.select("select * from users").await);
    assert_eq!(db.err_message(), "Not connected to the database");
    assert!(db.connect().await, "{}", db.err_message());
    assert!(db.is_connected());
    assert_eq!(db.err_message(), "");
    db.empty_params();
    assert!(db.select("select count(*) as total from users").await);
    assert_eq!(
        db.next_row()
            .expect("The count must be returned")
            .get::<i64>("total")
            .unwrap(),
        4
    );
}
