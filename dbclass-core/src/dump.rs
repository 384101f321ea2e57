use crate::Params;
use std::fmt::{self, Display, Write};

/// Debug trace of an executed statement: the SQL as written, the named
/// parameters it was given and their values.
///
/// ```text
/// SQL: [34] select * from users where id = :id
/// Params:  1
/// Key: Name: [3] :id
/// paramno=-1
/// name=[3] ":id"
/// is_param=1
/// param_type=2
///
/// [1] id: 5
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct QueryDump(String);

impl QueryDump {
    pub fn new(sql: &str, params: &Params) -> Self {
        let mut out = String::new();
        let _ = writeln!(out, "SQL: [{}] {}", sql.len(), sql);
        let _ = writeln!(out, "Params:  {}", params.len());
        for (name, _) in params.iter() {
            let key = format!(":{}", name);
            let _ = writeln!(out, "Key: Name: [{}] {}", key.len(), key);
            let _ = writeln!(out, "paramno=-1");
            let _ = writeln!(out, "name=[{}] \"{}\"", key.len(), key);
            let _ = writeln!(out, "is_param=1");
            let _ = writeln!(out, "param_type=2");
        }
        out.push('\n');
        for (i, (name, value)) in params.iter().enumerate() {
            let _ = writeln!(out, "[{}] {}: {}", i + 1, name, value);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for QueryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<QueryDump> for String {
    fn from(value: QueryDump) -> Self {
        value.0
    }
}
