//! Static seed data. Everything the prototype shows comes from here —
//! there is no server-side persistence.

use crate::files::{EditorFile, FileItem, FileKind, FileStatus, Organization, Page, Plan};
use crate::id::LayerId;
use crate::model::{
    Color, Document, Layer, LayerKind, LayerProperties, LayerStyle, ShapeKind, TextAlign,
};

pub fn mock_organizations() -> Vec<Organization> {
    vec![
        Organization {
            id: "org1".into(),
            name: "Personal".into(),
            icon: "👤".into(),
            plan: Plan::Free,
        },
        Organization {
            id: "org2".into(),
            name: "Design Studio".into(),
            icon: "🎨".into(),
            plan: Plan::Pro,
        },
        Organization {
            id: "org3".into(),
            name: "Startup Hub".into(),
            icon: "🚀".into(),
            plan: Plan::Team,
        },
    ]
}

pub fn mock_files() -> Vec<FileItem> {
    vec![
        FileItem {
            id: "file1".into(),
            title: "Mobile App Design".into(),
            thumbnail: "🎨".into(),
            last_edited_days_ago: 1,
            organization: "Personal".into(),
            kind: FileKind::File,
            status: FileStatus::Draft,
        },
        FileItem {
            id: "file2".into(),
            title: "Website Redesign 2024".into(),
            thumbnail: "🌐".into(),
            last_edited_days_ago: 3,
            organization: "Design Studio".into(),
            kind: FileKind::Project,
            status: FileStatus::Draft,
        },
        FileItem {
            id: "file3".into(),
            title: "Component Library".into(),
            thumbnail: "📦".into(),
            last_edited_days_ago: 5,
            organization: "Personal".into(),
            kind: FileKind::File,
            status: FileStatus::Published,
        },
        FileItem {
            id: "file4".into(),
            title: "Dashboard Prototype".into(),
            thumbnail: "📊".into(),
            last_edited_days_ago: 7,
            organization: "Startup Hub".into(),
            kind: FileKind::File,
            status: FileStatus::Draft,
        },
        FileItem {
            id: "file5".into(),
            title: "Brand Guidelines".into(),
            thumbnail: "✨".into(),
            last_edited_days_ago: 10,
            organization: "Design Studio".into(),
            kind: FileKind::Project,
            status: FileStatus::Published,
        },
        FileItem {
            id: "file6".into(),
            title: "Icon Set".into(),
            thumbnail: "🔷".into(),
            last_edited_days_ago: 14,
            organization: "Personal".into(),
            kind: FileKind::File,
            status: FileStatus::Draft,
        },
    ]
}

/// The editor file every `/editor/:fileId` route opens.
///
/// Page 1 is structural (a frame tree for the layer list, no geometry);
/// page 2 carries geometric layers so the canvas has something to draw.
pub fn mock_editor_file() -> EditorFile {
    EditorFile {
        id: "file1".into(),
        title: "Mobile App Design".into(),
        organization: "Personal".into(),
        status: FileStatus::Draft,
        pages: vec![
            Page {
                id: "page1".into(),
                name: "Page 1".into(),
                document: structural_page(),
            },
            Page {
                id: "page2".into(),
                name: "Scratch".into(),
                document: scratch_page(),
            },
        ],
        current_page_id: "page1".into(),
    }
}

fn structural_page() -> Document {
    let mut doc = Document::new();

    let home = doc.add_layer(
        None,
        Layer::new(LayerId::intern("home_screen"), "Home Screen", LayerKind::Frame),
    );
    doc.add_layer(
        Some(home),
        Layer::new(LayerId::intern("header"), "Header", LayerKind::Component),
    );
    doc.add_layer(
        Some(home),
        Layer::new(LayerId::intern("hero_title"), "Hero Title", LayerKind::Text),
    );
    doc.add_layer(
        Some(home),
        Layer::new(LayerId::intern("cta_button"), "CTA Button", LayerKind::Shape),
    );

    doc.add_layer(
        None,
        Layer::new(LayerId::intern("settings_screen"), "Settings Screen", LayerKind::Frame),
    );
    doc
}

fn scratch_page() -> Document {
    let mut doc = Document::new();

    let mut card = LayerProperties::at(120.0, 90.0, 320.0, 200.0);
    card.style = LayerStyle {
        fill: Color::from_hex("#6366F1"),
        corner_radius: 12.0,
        ..LayerStyle::default()
    };
    card.shape = Some(ShapeKind::Rectangle);
    doc.add_layer(
        None,
        Layer::new(LayerId::intern("card"), "Card", LayerKind::Shape).with_properties(card),
    );

    let mut title = LayerProperties::at(150.0, 120.0, 200.0, 40.0);
    title.style = LayerStyle {
        font_size: Some(18.0),
        font_weight: Some(600),
        text_align: Some(TextAlign::Left),
        ..LayerStyle::default()
    };
    title.content = Some("Welcome back".into());
    doc.add_layer(
        None,
        Layer::new(LayerId::intern("title"), "Title", LayerKind::Text).with_properties(title),
    );

    let mut badge = LayerProperties::at(480.0, 110.0, 80.0, 80.0);
    badge.style = LayerStyle {
        fill: Color::from_hex("#EC4899"),
        ..LayerStyle::default()
    };
    badge.shape = Some(ShapeKind::Circle);
    doc.add_layer(
        None,
        Layer::new(LayerId::intern("badge"), "Badge", LayerKind::Shape).with_properties(badge),
    );

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_data_is_consistent() {
        let orgs = mock_organizations();
        let files = mock_files();
        assert_eq!(orgs.len(), 3);
        assert_eq!(files.len(), 6);

        // Every file points at a seeded organization.
        for f in &files {
            assert!(
                orgs.iter().any(|o| o.name == f.organization),
                "file {} references unknown org {}",
                f.id,
                f.organization
            );
        }
    }

    #[test]
    fn editor_file_pages() {
        let file = mock_editor_file();
        assert_eq!(file.pages.len(), 2);

        let structural = file.page("page1").unwrap();
        assert_eq!(structural.document.top_level().len(), 2);
        // Structural layers carry no geometry.
        let home = structural.document.get(LayerId::intern("home_screen")).unwrap();
        assert!(home.properties.is_none());
        assert_eq!(structural.document.children_of(home.id).len(), 3);

        // The scratch page is fully geometric.
        let scratch = file.page("page2").unwrap();
        assert_eq!(scratch.document.len(), 3);
        for id in scratch.document.top_level() {
            assert!(scratch.document.get(id).unwrap().properties.is_some());
        }
    }
}
