//! Static GraphQL documents. Values are always passed as variables.

use stashnfo_common::RecordKind;

macro_rules! scene_fields {
    () => {
        "id title code details director date rating100 organized \
         studio { name } \
         performers { name gender image_path } \
         tags { name } \
         files { path duration }"
    };
}

macro_rules! performer_fields {
    () => {
        "id name disambiguation gender birthdate ethnicity country eye_color \
         height_cm measurements career_length tattoos piercings alias_list \
         details url twitter instagram rating100 \
         image: image_path"
    };
}

macro_rules! gallery_fields {
    () => {
        "id title code details photographer date rating100 \
         studio { name } \
         performers { name image_path } \
         tags { name } \
         folder { path }"
    };
}

pub const VERSION: &str = "query Version { version { version } }";

pub const FIND_SCENE: &str = concat!(
    "query FindScene($id: ID!) { findScene(id: $id) { ",
    scene_fields!(),
    " } }"
);

pub const FIND_PERFORMER: &str = concat!(
    "query FindPerformer($id: ID!) { findPerformer(id: $id) { ",
    performer_fields!(),
    " } }"
);

pub const FIND_GALLERY: &str = concat!(
    "query FindGallery($id: ID!) { findGallery(id: $id) { ",
    gallery_fields!(),
    " } }"
);

pub const FIND_SCENES: &str = concat!(
    "query FindScenes($filter: FindFilterType) { findScenes(filter: $filter) { count scenes { ",
    scene_fields!(),
    " } } }"
);

pub const FIND_PERFORMERS: &str = concat!(
    "query FindPerformers($filter: FindFilterType) { findPerformers(filter: $filter) { count performers { ",
    performer_fields!(),
    " } } }"
);

pub const FIND_GALLERIES: &str = concat!(
    "query FindGalleries($filter: FindFilterType) { findGalleries(filter: $filter) { count galleries { ",
    gallery_fields!(),
    " } } }"
);

pub const FIND_SCENE_BY_PATH: &str = concat!(
    "query FindSceneByPath($filter: FindFilterType, $scene_filter: SceneFilterType) { ",
    "findScenes(filter: $filter, scene_filter: $scene_filter) { count scenes { ",
    scene_fields!(),
    " } } }"
);

/// A query document and the path of its result inside `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub document: &'static str,
    pub field: &'static str,
    /// List key inside `field` for search queries.
    pub list: Option<&'static str>,
}

/// Single-record lookup by id.
pub fn find_by_id(kind: RecordKind) -> Query {
    let (document, field) = match kind {
        RecordKind::Scene => (FIND_SCENE, "findScene"),
        RecordKind::Performer => (FIND_PERFORMER, "findPerformer"),
        RecordKind::Gallery => (FIND_GALLERY, "findGallery"),
    };
    Query {
        document,
        field,
        list: None,
    }
}

/// Free-text search.
pub fn search(kind: RecordKind) -> Query {
    let (document, field, list) = match kind {
        RecordKind::Scene => (FIND_SCENES, "findScenes", "scenes"),
        RecordKind::Performer => (FIND_PERFORMERS, "findPerformers", "performers"),
        RecordKind::Gallery => (FIND_GALLERIES, "findGalleries", "galleries"),
    };
    Query {
        document,
        field,
        list: Some(list),
    }
}

/// Scene lookup by exact file path.
pub fn scene_by_path() -> Query {
    Query {
        document: FIND_SCENE_BY_PATH,
        field: "findScenes",
        list: Some("scenes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_declare_variables() {
        for kind in RecordKind::ALL {
            let single = find_by_id(kind);
            assert!(single.document.contains("($id: ID!)"));
            assert!(single.document.contains(&format!("{}(id: $id)", single.field)));
            assert!(single.list.is_none());

            let many = search(kind);
            assert!(many.document.contains("($filter: FindFilterType)"));
            assert!(many.document.contains(many.list.unwrap()));
        }
    }

    #[test]
    fn braces_balance() {
        for document in [
            VERSION,
            FIND_SCENE,
            FIND_PERFORMER,
            FIND_GALLERY,
            FIND_SCENES,
            FIND_PERFORMERS,
            FIND_GALLERIES,
            FIND_SCENE_BY_PATH,
        ] {
            let open = document.matches('{').count();
            let close = document.matches('}').count();
            assert_eq!(open, close, "{document}");
        }
    }

    #[test]
    fn performer_image_is_aliased() {
        assert!(FIND_PERFORMER.contains("image: image_path"));
    }
}
