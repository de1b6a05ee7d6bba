//! Social history: a keyed tree of observations linked by `entryRelationship`.
//!
//! Each statement keeps only the relationships at the shallowest depth below
//! it; deeper ones belong to those relationships and are reached by recursion,
//! so nesting depth is unbounded.

use ccda_core::{SocialHistoryItem, SocialHistorySection};
use indexmap::IndexMap;

use super::{first_non_empty, statement_of, status_code, EffectiveTime};
use crate::codes::resolve_code;
use crate::value::resolve_value;
use crate::xml::Element;

pub fn extract(sections: &[Element<'_>]) -> SocialHistorySection {
    let mut items = IndexMap::new();
    for section in sections {
        let statements = section
            .children_named("entry")
            .map(statement_of)
            .collect::<Vec<_>>();
        insert_all(&mut items, &statements, *section);
    }

    tracing::trace!(
        items = items.len(),
        depth = items.values().map(SocialHistoryItem::depth).max().unwrap_or(0),
        "social history extracted"
    );
    SocialHistorySection { items }
}

fn insert_all(
    target: &mut IndexMap<String, SocialHistoryItem>,
    statements: &[Element<'_>],
    section: Element<'_>,
) {
    for statement in statements {
        let item = build_item(*statement, section);
        let key = item_key(&item, target.len() + 1);
        target.insert(key, item);
    }
}

fn build_item(statement: Element<'_>, section: Element<'_>) -> SocialHistoryItem {
    let code = resolve_code(statement);
    let time = EffectiveTime::of(statement);

    let related: Vec<Element<'_>> = shallowest_relationships(statement)
        .into_iter()
        .map(statement_of)
        .collect();
    let entity_relationships = if related.is_empty() {
        None
    } else {
        let mut children = IndexMap::new();
        insert_all(&mut children, &related, section);
        Some(children)
    };

    SocialHistoryItem {
        title: first_non_empty([code.display_name.clone(), code.code.clone()]),
        value: resolve_value(statement, section),
        code,
        datetime: time.value,
        datetime_low: time.low,
        datetime_high: time.high,
        status_code: status_code(statement),
        entity_relationships,
    }
}

/// `entryRelationship` descendants of `statement` at the minimum depth below it.
fn shallowest_relationships(statement: Element<'_>) -> Vec<Element<'_>> {
    let all: Vec<Element<'_>> = statement.find_all("entryRelationship").collect();
    let Some(shallowest) = all.iter().map(Element::depth).min() else {
        return Vec::new();
    };
    all.into_iter()
        .filter(|relationship| relationship.depth() == shallowest)
        .collect()
}

/// Map key: code, then display name, then `#<ordinal>` among siblings.
fn item_key(item: &SocialHistoryItem, ordinal: usize) -> String {
    first_non_empty([
        item.code.code.clone(),
        item.code.display_name.clone(),
        format!("#{ordinal}"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn relationships_inside_relationships_are_not_siblings() {
        let xml = r#"<section>
  <entry><observation>
    <code code="A"/>
    <entryRelationship><observation><code code="B"/>
      <entryRelationship><observation><code code="C"/></observation></entryRelationship>
    </observation></entryRelationship>
    <entryRelationship><observation><code displayName="Named only"/></observation></entryRelationship>
    <entryRelationship><observation><value value="x"/></observation></entryRelationship>
  </observation></entry>
</section>"#;
        let doc = Document::parse(xml).unwrap();
        let section = extract(&[doc.root()]);

        let top = &section.items["A"];
        let children = top.entity_relationships.as_ref().unwrap();
        let keys: Vec<&str> = children.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "Named only", "#3"]);
        assert_eq!(children["#3"].value, "x");
        assert!(top.relationship("B").unwrap().relationship("C").is_some());
        assert!(top.relationship("C").is_none());
        assert_eq!(top.depth(), 2);
    }
}
