#[cfg(test)]
mod tests {
    use dbclass_core::{
        Connection, Executor, Params, Prepared, Query, RowLabeled, Value, stream::TryStreamExt,
    };
    use dbclass_mysql::MySQLConnection;
    use dbclass_tests::{init_logs, init_mysql, silent_logs};
    use std::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn mysql_connection() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let (url, container) = init_mysql().await;
        let mut connection = MySQLConnection::connect(url.into())
            .await
            .expect("Could not connect to MySQL");

        // Text protocol, several statements
        connection
            .run_script(
                "DROP TABLE IF EXISTS driver_items;
                CREATE TABLE driver_items (
                    id INTEGER AUTO_INCREMENT PRIMARY KEY,
                    name VARCHAR(16) NOT NULL,
                    price DECIMAL(6, 2)
                );"
                .into(),
            )
            .await
            .expect("Failed to create driver_items");

        // Named parameters
        let params: Params = [("name", Value::from("pen")), ("price", Value::from("1.50"))]
            .into_iter()
            .collect();
        let result = connection
            .run_named(
                "INSERT INTO driver_items (name, price) VALUES (:name, :price)",
                &params,
            )
            .await
            .expect("Failed to insert the pen");
        assert_eq!(result.affected.rows_affected, 1);
        assert_eq!(result.affected.last_affected_id, Some(1));
        assert_eq!(connection.last_insert_id().await.unwrap(), Some(1));

        // Prepared statement reused with different bindings
        let mut query = connection
            .prepare("INSERT INTO driver_items (name, price) VALUES (?, ?)".into())
            .await
            .expect("Failed to prepare the insert");
        let Query::Prepared(prepared) = &query else {
            panic!("The query must be prepared");
        };
        assert_eq!(prepared.param_count(), 2);
        query.bind("ink").unwrap().bind(None::<i32>).unwrap();
        let affected = connection.execute(query).await.expect("Failed to insert ink");
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(connection.last_insert_id().await.unwrap(), Some(2));

        // Rows
        let rows: Vec<RowLabeled> = connection
            .fetch(Query::Raw(
                "SELECT id, name, price FROM driver_items ORDER BY id".into(),
            ))
            .try_collect()
            .await
            .expect("Failed to select the items");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].names(), ["id", "name", "price"]);
        assert_eq!(rows[0].get::<String>("name").unwrap(), "pen");
        assert_eq!(rows[0].get::<String>("price").unwrap(), "1.50");
        assert!(rows[1].get_column("price").unwrap().is_null());

        // Missing values and wrong indexes
        let mut query = connection
            .prepare("SELECT ? + ?".into())
            .await
            .expect("Failed to prepare the sum");
        assert!(query.bind_index(1, 5).is_err());
        query.bind(1).unwrap();
        silent_logs! {
            assert!(connection.execute(query).await.is_err());
        }

        // The connection is still usable after an error
        silent_logs! {
            assert!(connection.run_script("SELECT * FROM missing_table".into()).await.is_err());
        }
        let result = connection
            .run_named(
                "SELECT CAST(:a AS SIGNED) + CAST(:a AS SIGNED) AS total",
                &[("a", 21)].into_iter().collect(),
            )
            .await
            .expect("Failed to compute the total");
        assert_eq!(result.rows[0].get::<i64>("total").unwrap(), 42);

        connection
            .run_script("DROP TABLE driver_items".into())
            .await
            .expect("Failed to drop driver_items");
        connection.disconnect().await.expect("Failed to disconnect");
        drop(container);
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                MySQLConnection::connect("postgres://some_url".into())
                    .await
                    .is_err()
            );
            assert!(
                MySQLConnection::connect("mysql://user@127.0.0.1:1/db?charset=utf8;drop".into())
                    .await
                    .is_err()
            );
        }
    }
}
