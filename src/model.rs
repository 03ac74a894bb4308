pub(crate) mod expression;
pub(crate) mod family;
pub(crate) mod meaning;
