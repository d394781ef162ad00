pub(crate) mod assertions;
pub(crate) mod helpers;
