//! People, places and organizations: performers, participants and authors.

use ccda_core::{Address, Author, Organization, Participant, Performer, PersonName, Telecom};

use crate::codes::{coded_value, resolve_code};
use crate::xml::Element;

pub fn person_name(name: Element<'_>) -> PersonName {
    let part = |tag: &str| {
        name.child(tag)
            .map(|part| part.trimmed_text())
            .unwrap_or_default()
    };
    PersonName {
        prefix: part("prefix"),
        given: name
            .children_named("given")
            .map(|given| given.trimmed_text())
            .filter(|given| !given.is_empty())
            .collect(),
        family: part("family"),
        suffix: part("suffix"),
    }
}

pub fn address(addr: Element<'_>) -> Address {
    let part = |tag: &str| {
        addr.child(tag)
            .map(|part| part.trimmed_text())
            .unwrap_or_default()
    };
    Address {
        use_code: addr.attr_or_empty("use"),
        street_address_lines: addr
            .children_named("streetAddressLine")
            .map(|line| line.trimmed_text())
            .filter(|line| !line.is_empty())
            .collect(),
        city: part("city"),
        state: part("state"),
        postal_code: part("postalCode"),
        country: part("country"),
    }
}

pub fn telecom(telecom: Element<'_>) -> Telecom {
    Telecom {
        use_code: telecom.attr_or_empty("use"),
        value: telecom.attr_or_empty("value"),
    }
}

fn addresses(holder: Element<'_>) -> Vec<Address> {
    holder
        .children_named("addr")
        .map(address)
        .filter(|addr| !addr.is_empty())
        .collect()
}

fn telecoms(holder: Element<'_>) -> Vec<Telecom> {
    holder
        .children_named("telecom")
        .map(telecom)
        .filter(|telecom| !telecom.value.is_empty())
        .collect()
}

pub fn organization(org: Element<'_>) -> Organization {
    Organization {
        name: org
            .child("name")
            .map(|name| name.trimmed_text())
            .unwrap_or_default(),
        addresses: addresses(org),
        telecoms: telecoms(org),
    }
}

/// Name of an `assignedPerson` under `holder`.
fn assigned_person_name(holder: Element<'_>) -> Option<PersonName> {
    holder
        .child("assignedPerson")?
        .child("name")
        .map(person_name)
        .filter(|name| !name.is_empty())
}

pub fn performer(performer: Element<'_>) -> Performer {
    let function_code = performer
        .child("functionCode")
        .map(coded_value)
        .unwrap_or_default();

    let Some(entity) = performer.child("assignedEntity") else {
        return Performer {
            function_code,
            ..Performer::default()
        };
    };

    Performer {
        name: assigned_person_name(entity),
        specialty: resolve_code(entity),
        function_code,
        addresses: addresses(entity),
        telecoms: telecoms(entity),
        organization: entity.child("representedOrganization").map(organization),
    }
}

pub fn participant(participant: Element<'_>) -> Participant {
    let type_code = participant.attr_or_empty("typeCode");
    let Some(role) = participant.child("participantRole") else {
        return Participant {
            type_code,
            ..Participant::default()
        };
    };

    Participant {
        type_code,
        role_code: resolve_code(role),
        addresses: addresses(role),
        telecoms: telecoms(role),
        facility_name: role
            .child("playingEntity")
            .and_then(|entity| entity.child("name"))
            .map(|name| name.trimmed_text())
            .unwrap_or_default(),
    }
}

pub fn author(author: Element<'_>) -> Author {
    let time = author
        .child("time")
        .map(|time| time.attr_or_empty("value"))
        .unwrap_or_default();
    let Some(assigned) = author.child("assignedAuthor") else {
        return Author {
            time,
            ..Author::default()
        };
    };

    Author {
        time,
        name: assigned_person_name(assigned),
        addresses: addresses(assigned),
        telecoms: telecoms(assigned),
        organization: assigned.child("representedOrganization").map(organization),
    }
}
