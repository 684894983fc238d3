// ============ Model implementations ============

pub(crate) mod bert;
