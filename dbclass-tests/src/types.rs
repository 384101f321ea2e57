use dbclass::{Db, Dbms, Value};
use indoc::{formatdoc, indoc};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::macros::{date, datetime, time};

pub async fn types(db: &mut Db) {
    let (boolean, double, blob, datetime) = match db.config().dbms {
        Dbms::PostgreSQL => ("BOOLEAN", "DOUBLE PRECISION", "BYTEA", "TIMESTAMP"),
        _ => ("BOOLEAN", "DOUBLE", "BLOB", "DATETIME"),
    };

    // Setup
    db.empty_params();
    assert!(db.exec_script("DROP TABLE IF EXISTS typed_values").await);
    let create = formatdoc!(
        "
            CREATE TABLE typed_values (
                id INTEGER PRIMARY KEY,
                flag {boolean},
                small SMALLINT,
                big BIGINT,
                ratio {double},
                price DECIMAL(10, 2),
                name VARCHAR(32),
                payload {blob},
                day DATE,
                moment TIME,
                created {datetime}
            )
        ",
        boolean = boolean,
        double = double,
        blob = blob,
        datetime = datetime,
    );
    assert!(
        db.exec_script(&create).await,
        "Failed to create typed_values: {}",
        db.err_message()
    );

    // Typed parameters
    let price = Decimal::from_str("1234.56").unwrap();
    db.add_param_to_bind("id", 1);
    db.add_param_to_bind("flag", true);
    db.add_param_to_bind("small", -12i16);
    db.add_param_to_bind("big", 9_876_543_210i64);
    db.add_param_to_bind("ratio", 0.25f64);
    db.add_param_to_bind("price", price);
    db.add_param_to_bind("name", "Zoë");
    db.add_param_to_bind("payload", vec![0u8, 1, 2, 255]);
    db.add_param_to_bind("day", date!(2024 - 02 - 29));
    db.add_param_to_bind("moment", time!(23:59:58));
    db.add_param_to_bind("created", datetime!(2025-07-15 10:00:00));
    let insert = indoc! {"
        INSERT INTO typed_values (id, flag, small, big, ratio, price, name, payload, day, moment, created)
        VALUES (:id, :flag, :small, :big, :ratio, :price, :name, :payload, :day, :moment, :created)
    "};
    assert!(db.insert(insert).await, "{}", db.err_message());

    db.empty_params();
    db.add_param_to_bind("id", 1);
    assert!(
        db.select("SELECT * FROM typed_values WHERE id = :id").await,
        "{}",
        db.err_message()
    );
    let row = db.next_row().expect("The typed row must exist");
    assert!(row.get::<bool>("flag").unwrap());
    assert_eq!(row.get::<i16>("small").unwrap(), -12);
    assert_eq!(row.get::<i64>("big").unwrap(), 9_876_543_210);
    assert_eq!(row.get::<f64>("ratio").unwrap(), 0.25);
    assert_eq!(row.get::<Decimal>("price").unwrap(), price);
    assert_eq!(row.get::<String>("name").unwrap(), "Zoë");
    assert_eq!(row.get::<Vec<u8>>("payload").unwrap(), [0, 1, 2, 255]);
    assert_eq!(row.get::<time::Date>("day").unwrap(), date!(2024 - 02 - 29));
    assert_eq!(row.get::<time::Time>("moment").unwrap(), time!(23:59:58));
    assert_eq!(
        row.get::<time::PrimitiveDateTime>("created").unwrap(),
        datetime!(2025-07-15 10:00:00)
    );

    // Text parameters are converted to the column types
    db.empty_params();
    db.add_param_to_bind("id", "2");
    db.add_param_to_bind("big", "42");
    db.add_param_to_bind("price", "0.50");
    db.add_param_to_bind("day", "1999-12-31");
    assert!(
        db.insert("INSERT INTO typed_values (id, big, price, day) VALUES (:id, :big, :price, :day)")
            .await,
        "{}",
        db.err_message()
    );
    db.empty_params();
    db.add_param_to_bind("big", 42);
    assert!(db.select("SELECT id, flag, price, day FROM typed_values WHERE big = :big").await);
    let row = db.next_row().expect("The second typed row must exist");
    assert_eq!(row.get::<i32>("id").unwrap(), 2);
    assert!(row.get_column("flag").is_some_and(Value::is_null));
    assert_eq!(row.get::<Option<bool>>("flag").unwrap(), None);
    assert_eq!(
        row.get::<Decimal>("price").unwrap(),
        Decimal::from_str("0.50").unwrap()
    );
    assert_eq!(row.get::<time::Date>("day").unwrap(), date!(1999 - 12 - 31));
    assert!(db.next_row().is_none());

    db.empty_params();
    assert!(db.exec_script("DROP TABLE typed_values").await);
}
