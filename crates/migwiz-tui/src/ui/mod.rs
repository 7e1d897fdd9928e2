pub(crate) mod modal;
pub(crate) mod overlay;
pub(crate) mod text;
