pub(crate) mod invoke;
pub(crate) mod serve;
pub(crate) mod sql;
