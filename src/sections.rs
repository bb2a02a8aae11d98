use crate::heading::{Heading, Section};

/// Partition a flat heading list into one section per level-1 heading.
///
/// Headings that appear before the first level-1 heading have no section and
/// are dropped.
pub fn split_sections(headings: &[Heading]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for heading in headings {
        if heading.level == 1 {
            sections.push(Section {
                title: heading.clone(),
                sub_headings: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.sub_headings.push(heading.clone());
        }
    }

    sections
}
