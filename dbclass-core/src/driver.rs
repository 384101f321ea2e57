use crate::{Connection, Dbms, Prepared};

/// Style of the positional placeholders a backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter, bound in order of appearance.
    QuestionMark,
    /// `$1`, `$2`, ... a parameter can be referenced more than once.
    Dollar,
}

pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type Prepared: Prepared;

    /// Scheme of the connection urls accepted.
    const NAME: &'static str;
    const PLACEHOLDER: PlaceholderStyle;

    /// Engines this driver can talk to.
    fn handles(dbms: Dbms) -> bool;
}
