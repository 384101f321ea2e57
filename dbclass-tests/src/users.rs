use dbclass::{Db, Dbms};
use indoc::indoc;

pub async fn users(db: &mut Db) {
    // Setup
    db.empty_params();
    assert!(
        db.exec_script("DROP TABLE IF EXISTS users").await,
        "Failed to drop the users table: {}",
        db.err_message()
    );
    let create = match db.config().dbms {
        Dbms::PostgreSQL => indoc! {"
            CREATE TABLE users (
                id SERIAL PRIMARY KEY,
                firstname VARCHAR(64) NOT NULL,
                lastname VARCHAR(64) NOT NULL,
                level INTEGER NOT NULL DEFAULT 1
            )
        "},
        _ => indoc! {"
            CREATE TABLE users (
                id INTEGER AUTO_INCREMENT PRIMARY KEY,
                firstname VARCHAR(64) NOT NULL,
                lastname VARCHAR(64) NOT NULL,
                level INTEGER NOT NULL DEFAULT 1
            )
        "},
    };
    assert!(
        db.exec_script(create).await,
        "Failed to create the users table: {}",
        db.err_message()
    );
    for (firstname, lastname, level) in [
        ("John", "Lennon", 1),
        ("Paul", "McCartney", 1),
        ("George", "Harrison", 2),
        ("Ringo", "Starr", 3),
    ] {
        db.empty_params();
        db.add_param_to_bind("firstname", firstname);
        db.add_param_to_bind("lastname", lastname);
        db.add_param_to_bind("level", level);
        assert!(
            db.insert("insert into users (firstname, lastname, level) values (:firstname, :lastname, :level)")
                .await,
            "Failed to insert {firstname}: {}",
            db.err_message()
        );
        assert_eq!(db.rows_affected(), 1);
    }

    // Select with syntax error
    db.empty_params();
    assert!(!db.select("select * from users_error").await);
    assert!(!db.err_message().is_empty());
    assert!(db.next_row().is_none());

    // Select with no parameters and order by
    db.empty_params();
    assert!(
        db.select("select * from users order by id desc").await,
        "{}",
        db.err_message()
    );
    assert!(db.err_message().is_empty());
    let mut ids = Vec::new();
    while let Some(row) = db.next_row() {
        assert_eq!(row.names(), ["id", "firstname", "lastname", "level"]);
        ids.push(row.get::<i64>("id").expect("The id must be an integer"));
    }
    assert_eq!(ids, [4, 3, 2, 1]);

    // Select with parameters
    db.empty_params();
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("id5", 5);
    assert!(
        db.select("select * from users where id = :id or id = :id5")
            .await,
        "{}",
        db.err_message()
    );
    let row = db.next_row().expect("The user 1 must exist");
    assert_eq!(row.get::<String>("firstname").unwrap(), "John");
    assert_eq!(row.get::<String>("lastname").unwrap(), "Lennon");
    assert!(db.next_row().is_none());

    // Same parameter used twice
    db.empty_params();
    db.add_param_to_bind("level", 1);
    assert!(
        db.select("select id from users where level = :level and id > :level order by id")
            .await,
        "{}",
        db.err_message()
    );
    let row = db.next_row().expect("The user 2 must be returned");
    assert_eq!(row.get::<i64>("id").unwrap(), 2);
    assert!(db.next_row().is_none());

    // Select with group by
    db.empty_params();
    assert!(
        db.select("select level, count(*) as total from users group by level order by level")
            .await,
        "{}",
        db.err_message()
    );
    let mut totals = Vec::new();
    while let Some(row) = db.next_row() {
        totals.push((
            row.get::<i32>("level").unwrap(),
            row.get::<i64>("total").unwrap(),
        ));
    }
    assert_eq!(totals, [(1, 2), (2, 1), (3, 1)]);

    // Insert with duplicated primary key
    db.empty_params();
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("firstname", "Michael");
    db.add_param_to_bind("lastname", "Jackson");
    assert!(
        !db.insert("insert into users (id, firstname, lastname) values (:id, :firstname, :lastname)")
            .await
    );
    assert!(!db.err_message().is_empty());
    assert_eq!(db.last_id(), None);

    // Insert with parameters and debug dump
    db.set_debug(true);
    db.empty_params();
    db.add_param_to_bind("firstname", "Michael");
    db.add_param_to_bind("lastname", "Jackson");
    let sql = "insert into users (firstname, lastname) values (:firstname, :lastname)";
    assert!(db.insert(sql).await, "{}", db.err_message());
    let last_id = db.last_id().expect("The insert must generate an id");
    assert_eq!(last_id, 5);
    let dump = db.query_dump().to_string();
    assert!(dump.starts_with(&format!("SQL: [{}] {}\n", sql.len(), sql)));
    assert!(dump.contains("Params:  2\n"));
    assert!(dump.contains("Key: Name: [10] :firstname\n"));
    assert!(dump.ends_with("\n[1] firstname: Michael\n[2] lastname: Jackson\n"));
    db.set_debug(false);

    db.empty_params();
    db.add_param_to_bind("id", last_id);
    assert!(db.select("select * from users where id = :id").await);
    let row = db.next_row().expect("The inserted user must exist");
    assert_eq!(row.get::<String>("lastname").unwrap(), "Jackson");
    assert_eq!(row.get::<i64>("level").unwrap(), 1);
    // A select keeps the last id
    assert_eq!(db.last_id(), Some(last_id));
    // The dump is kept from the last statement run in debug mode
    assert_eq!(db.query_dump(), dump);

    // Update the last inserted record
    db.empty_params();
    db.add_param_to_bind("id", last_id);
    db.add_param_to_bind("lastname", "Jordan");
    assert!(
        db.update("update users set lastname = :lastname where id = :id")
            .await,
        "{}",
        db.err_message()
    );
    assert_eq!(db.rows_affected(), 1);
    db.empty_params();
    db.add_param_to_bind("id", last_id);
    assert!(db.select("select lastname from users where id = :id").await);
    let row = db.next_row().expect("The updated user must exist");
    assert_eq!(row.get::<String>("lastname").unwrap(), "Jordan");

    // Delete the last inserted record
    db.empty_params();
    db.add_param_to_bind("id", last_id);
    assert!(
        db.delete("delete from users where id = :id").await,
        "{}",
        db.err_message()
    );
    assert_eq!(db.rows_affected(), 1);
    db.empty_params();
    db.add_param_to_bind("id", last_id);
    assert!(db.select("select * from users where id = :id").await);
    assert!(db.next_row().is_none());
}
