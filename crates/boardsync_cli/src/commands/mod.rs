pub(crate) mod board;
pub(crate) mod issues;
pub(crate) mod migrate;
pub(crate) mod pins;
pub(crate) mod status;
pub(crate) mod sync;
