pub(crate) mod contract;
pub(crate) mod families;
pub(crate) mod legacy;
pub(crate) mod output;
