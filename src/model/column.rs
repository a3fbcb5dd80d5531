/// Column identity is derived from the status string: lowercase, spaces to
/// hyphens. `"Not Contacted"` and `"not contacted"` land in the same column.
pub fn slug(status: &str) -> String {
    status.trim().to_lowercase().replace(' ', "-")
}

/// The wire form for `POST /api/update_status` is hyphen-free: the slug with
/// hyphens turned back into spaces.
pub fn wire_label(slug: &str) -> String {
    slug.replace('-', " ")
}

/// One board column: a display name plus its derived slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub slug: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slug(&name);
        ColumnDef { name, slug }
    }
}

/// Build column definitions from the configured status labels.
pub fn columns_from_names(names: &[String]) -> Vec<ColumnDef> {
    names.iter().map(ColumnDef::new).collect()
}
