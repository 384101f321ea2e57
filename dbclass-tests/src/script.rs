use dbclass::{Db, Dbms};
use indoc::formatdoc;

pub async fn script(db: &mut Db) {
    let serial = match db.config().dbms {
        Dbms::PostgreSQL => "SERIAL",
        _ => "INTEGER AUTO_INCREMENT",
    };

    // Several statements at once
    db.empty_params();
    let setup = formatdoc!(
        "
            DROP TABLE IF EXISTS script_items;
            CREATE TABLE script_items (
                id {} PRIMARY KEY,
                label VARCHAR(32) NOT NULL,
                amount INTEGER
            );
            INSERT INTO script_items (label, amount) VALUES ('first', 10);
            INSERT INTO script_items (label, amount) VALUES ('second', NULL);
        ",
        serial
    );
    assert!(
        db.exec_script(&setup).await,
        "Failed to run the setup script: {}",
        db.err_message()
    );

    // A script with parameters is a single prepared statement
    db.add_param_to_bind("label", "third");
    db.add_param_to_bind("amount", 30);
    assert!(
        db.exec_script("INSERT INTO script_items (label, amount) VALUES (:label, :amount)")
            .await,
        "{}",
        db.err_message()
    );
    assert_eq!(db.rows_affected(), 1);
    // The statement is not an insert, the last id is not captured
    let last_id = db.last_id();

    // Parameters stay staged until emptied
    assert!(
        db.select("SELECT label FROM script_items WHERE label = :label AND amount = :amount")
            .await,
        "{}",
        db.err_message()
    );
    let row = db.next_row().expect("The third item must exist");
    assert_eq!(row.get::<String>("label").unwrap(), "third");
    assert_eq!(db.last_id(), last_id);

    // Rows from a script
    db.empty_params();
    assert!(
        db.exec_script("SELECT label, amount FROM script_items ORDER BY id")
            .await,
        "{}",
        db.err_message()
    );
    let mut labels = Vec::new();
    while let Some(row) = db.next_row() {
        labels.push(row.get::<String>("label").unwrap());
        if labels.len() == 2 {
            assert!(row.get_column("amount").unwrap().is_null());
        }
    }
    assert_eq!(labels, ["first", "second", "third"]);

    // Nulls through parameters
    db.add_param_to_bind("label", "fourth");
    db.add_param_to_bind("amount", None::<i32>);
    assert!(
        db.insert("INSERT INTO script_items (label, amount) VALUES (:label, :amount)")
            .await,
        "{}",
        db.err_message()
    );
    assert_eq!(db.last_id(), Some(4));
    db.empty_params();
    db.add_param_to_bind("id", 4);
    assert!(db.select("SELECT amount FROM script_items WHERE id = :id").await);
    let row = db.next_row().expect("The fourth item must exist");
    assert_eq!(row.get::<Option<i32>>("amount").unwrap(), None);

    db.empty_params();
    assert!(db.exec_script("DROP TABLE script_items").await);
}
