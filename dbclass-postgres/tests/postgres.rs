#[cfg(test)]
mod tests {
    use dbclass_core::{
        Connection, Executor, Params, Prepared, Query, QueryResult, Value, stream::TryStreamExt,
    };
    use dbclass_postgres::{PostgresConnection, postgres_type_to_value};
    use dbclass_tests::{init_logs, init_postgres, silent_logs};
    use std::sync::Mutex;
    use tokio_postgres::types::Type;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn postgres_connection() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let (url, container) = init_postgres().await;
        let mut connection = PostgresConnection::connect(url.into())
            .await
            .expect("Could not connect to Postgres");

        // No sequence used yet
        assert_eq!(connection.last_insert_id().await.unwrap(), None);

        // Simple query protocol, several statements
        let results: Vec<QueryResult> = connection
            .run(Query::Raw(
                "DROP TABLE IF EXISTS driver_items;
                CREATE TABLE driver_items (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(16) NOT NULL,
                    price NUMERIC(6, 2)
                );
                INSERT INTO driver_items (name, price) VALUES ('pen', 1.5), ('ink', NULL);"
                    .into(),
            ))
            .try_collect()
            .await
            .expect("Failed to create driver_items");
        let inserted = results.iter().find_map(|v| match v {
            QueryResult::Affected(affected) if affected.rows_affected > 0 => Some(affected),
            _ => None,
        });
        assert_eq!(inserted.map(|v| v.rows_affected), Some(2));
        assert_eq!(connection.last_insert_id().await.unwrap(), Some(2));

        // Named parameters converted to the types of the statement
        let params: Params = [("name", "pad"), ("price", "3.25")].into_iter().collect();
        let result = connection
            .run_named(
                "INSERT INTO driver_items (name, price) VALUES (:name, :price);",
                &params,
            )
            .await
            .expect("Failed to insert the pad");
        assert_eq!(result.affected.rows_affected, 1);
        assert_eq!(connection.last_insert_id().await.unwrap(), Some(3));

        // Repeated names are sent once
        let mut params = Params::new();
        params.push(":low", 2);
        let result = connection
            .run_named(
                "SELECT id, name, price, price::text AS label FROM driver_items WHERE id >= :low AND id < :low + 2 ORDER BY id",
                &params,
            )
            .await
            .expect("Failed to select the items");
        assert_eq!(result.rows.len(), 2);
        let ink = &result.rows[0];
        assert_eq!(ink.names(), ["id", "name", "price", "label"]);
        assert_eq!(ink.get_column("id"), Some(&Value::Int32(Some(2))));
        assert_eq!(ink.get::<String>("name").unwrap(), "ink");
        assert!(ink.get_column("price").unwrap().is_null());
        let pad = &result.rows[1];
        assert_eq!(pad.get::<String>("label").unwrap(), "3.25");

        // Prepared statement
        let mut query = connection
            .prepare("SELECT $1::int4 + $2::int4 AS total".into())
            .await
            .expect("Failed to prepare the sum");
        let Query::Prepared(prepared) = &query else {
            panic!("The query must be prepared");
        };
        assert_eq!(prepared.param_count(), 2);
        assert!(query.bind_index(1, 2).is_err());
        query.bind(40).unwrap();
        let mut missing = connection
            .prepare("SELECT $1::int4 AS total".into())
            .await
            .expect("Failed to prepare the select");
        missing.clear_bindings().unwrap();
        silent_logs! {
            assert!(connection.execute(missing).await.is_err());
        }
        query.bind("2").unwrap();
        let rows = connection
            .fetch(query)
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to compute the total");
        assert_eq!(rows[0].get::<i64>("total").unwrap(), 42);

        // One byte "char" and types without a mapping
        connection
            .run_script(
                "DROP TABLE IF EXISTS driver_docs;
                CREATE TABLE driver_docs (id INTEGER PRIMARY KEY, kind \"char\", doc JSONB);"
                    .into(),
            )
            .await
            .expect("Failed to create driver_docs");
        let params: Params = [
            ("id", Value::from(1)),
            ("kind", Value::from(65i8)),
            ("doc", Value::from(r#"{"a": 1}"#)),
        ]
        .into_iter()
        .collect();
        let mut error = None;
        silent_logs! {
            error = connection
                .run_named(
                    "INSERT INTO driver_docs (id, kind, doc) VALUES (:id, :kind, :doc)",
                    &params,
                )
                .await
                .err();
        }
        let message = format!("{:#}", error.expect("A jsonb parameter needs a cast"));
        assert!(message.contains("type `jsonb` which cannot be bound"), "{}", message);
        connection
            .run_named(
                "INSERT INTO driver_docs (id, kind, doc) VALUES (:id, :kind, CAST(:doc AS text)::jsonb)",
                &params,
            )
            .await
            .expect("Failed to insert the document");
        let result = connection
            .run_named(
                "SELECT kind, kind::text AS letter, doc->>'a' AS a FROM driver_docs WHERE id = :id",
                &[("id", 1)].into_iter().collect(),
            )
            .await
            .expect("Failed to select the document");
        let row = &result.rows[0];
        assert_eq!(row.get_column("kind"), Some(&Value::Int8(Some(65))));
        assert_eq!(row.get::<String>("letter").unwrap(), "A");
        assert_eq!(row.get::<i32>("a").unwrap(), 1);
        // NULL is accepted for any type
        let params: Params = [("id", Value::from(2)), ("doc", Value::Null)]
            .into_iter()
            .collect();
        connection
            .run_named("INSERT INTO driver_docs (id, doc) VALUES (:id, :doc)", &params)
            .await
            .expect("Failed to insert a NULL document");

        // Errors keep the connection usable
        silent_logs! {
            assert!(connection.prepare("SELECT * FROM missing_table".into()).await.is_err());
        }
        connection
            .run_script("DROP TABLE driver_items; DROP TABLE driver_docs".into())
            .await
            .expect("Failed to drop driver_items");
        connection.disconnect().await.expect("Failed to disconnect");
        drop(container);
    }

    #[test]
    fn parameter_types() {
        assert_eq!(postgres_type_to_value(&Type::CHAR), Value::Int8(None));
        assert_eq!(postgres_type_to_value(&Type::INT2), Value::Int16(None));
        assert_eq!(postgres_type_to_value(&Type::TEXT), Value::Varchar(None));
        assert_eq!(postgres_type_to_value(&Type::JSONB), Value::Null);
        assert_eq!(postgres_type_to_value(&Type::INET), Value::Null);
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                PostgresConnection::connect("mysql://some_url".into())
                    .await
                    .is_err()
            );
            assert!(
                PostgresConnection::connect("postgres://user@127.0.0.1:1/db?sslmode=sometimes".into())
                    .await
                    .is_err()
            );
            assert!(
                PostgresConnection::connect("postgres://user@127.0.0.1:1/db".into())
                    .await
                    .is_err()
            );
        }
    }
}
