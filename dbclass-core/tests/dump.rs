#[cfg(test)]
mod tests {
    use dbclass_core::{Params, QueryDump};
    use indoc::indoc;

    #[test]
    fn dump_format() {
        let mut params = Params::new();
        params.push("id", 5);
        let dump = QueryDump::new("select * from users where id = :id", &params);
        assert_eq!(
            dump.as_str(),
            indoc! {r#"
                SQL: [34] select * from users where id = :id
                Params:  1
                Key: Name: [3] :id
                paramno=-1
                name=[3] ":id"
                is_param=1
                param_type=2

                [1] id: 5
            "#}
        );
    }

    #[test]
    fn dump_several_params() {
        let mut params = Params::new();
        params.push("firstname", "Jordan");
        params.push(":level", None::<i32>);
        let dump = QueryDump::new("update users set firstname = :firstname", &params);
        let text = dump.to_string();
        assert!(text.starts_with("SQL: [39] update users set firstname = :firstname\nParams:  2\n"));
        assert!(text.contains("Key: Name: [10] :firstname\n"));
        assert!(text.contains("name=[6] \":level\"\n"));
        assert!(text.ends_with("\n[1] firstname: Jordan\n[2] level: NULL\n"));
    }

    #[test]
    fn dump_empty() {
        assert!(QueryDump::default().is_empty());
        let dump = QueryDump::new("select 1", &Params::new());
        assert_eq!(String::from(dump), "SQL: [8] select 1\nParams:  0\n\n");
    }
}
