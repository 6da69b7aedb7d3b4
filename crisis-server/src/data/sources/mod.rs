pub(crate) mod reliefweb;
