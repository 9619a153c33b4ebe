use crate::domain::{ContactRepository, DomainError, NewContact};

fn demo(name: &str, phone: &str, email: &str, address: &str, instagram: Option<&str>) -> NewContact {
    NewContact {
        name: Some(name.to_owned()),
        phone: Some(phone.to_owned()),
        email: Some(email.to_owned()),
        address: Some(address.to_owned()),
        instagram: instagram.map(str::to_owned),
        ..Default::default()
    }
}

/// Insert a few demo contacts. Already-seeded rows are skipped.
pub async fn seed_demo_data(repo: &dyn ContactRepository) -> Result<usize, DomainError> {
    let contacts = vec![
        demo(
            "Ada Lovelace",
            "+44 20 7946 0001",
            "ada@example.com",
            "12 St James's Square, London",
            Some("ada.codes"),
        ),
        demo(
            "Grace Hopper",
            "+1 202 555 0147",
            "grace@example.com",
            "Arlington, Virginia",
            None,
        ),
        demo(
            "Alan Turing",
            "+44 161 496 0312",
            "alan@example.com",
            "Wilmslow, Cheshire",
            None,
        ),
    ];

    let mut inserted = 0;
    for contact in contacts {
        match repo.create(contact).await {
            Ok(_) => inserted += 1,
            Err(DomainError::Constraint(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(inserted)
}
