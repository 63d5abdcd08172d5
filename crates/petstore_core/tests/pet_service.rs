use petstore_core::{JsonPetRepository, Pet, PetPatch, PetService};

fn open_service() -> (tempfile::TempDir, PetService<JsonPetRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonPetRepository::open(dir.path().join("pets.json")).unwrap();
    (dir, PetService::new(repo))
}

fn pet(id: u64, name: &str, food: f64, weight: f64, age: f64) -> Pet {
    Pet {
        id,
        name: name.to_string(),
        food,
        weight,
        age,
    }
}

#[test]
fn birth_applies_newborn_defaults() {
    let (_dir, service) = open_service();

    let rex = service.birth("Rex").unwrap();

    assert_eq!(rex, pet(1, "Rex", 1.0, 1.0, 1.0));
    assert_eq!(service.get_pet_by_id(1).unwrap(), Some(rex));
}

#[test]
fn birth_update_delete_scenario() {
    let (_dir, service) = open_service();
    assert!(service.get_all_pets().unwrap().is_empty());

    assert_eq!(service.birth("Rex").unwrap(), pet(1, "Rex", 1.0, 1.0, 1.0));
    assert_eq!(service.birth("Fido").unwrap(), pet(2, "Fido", 1.0, 1.0, 1.0));

    let patch = PetPatch {
        weight: Some(10.0),
        ..PetPatch::default()
    };
    assert_eq!(
        service.update_pet_by_id(1, patch).unwrap(),
        Some(pet(1, "Rex", 1.0, 10.0, 1.0))
    );

    assert!(service.delete_pet_by_id(2).unwrap());
    assert_eq!(
        service.get_all_pets().unwrap(),
        vec![pet(1, "Rex", 1.0, 10.0, 1.0)]
    );
}

#[test]
fn explicit_null_in_json_patch_does_not_clear_field() {
    let (_dir, service) = open_service();
    service.birth("Rex").unwrap();

    let patch: PetPatch =
        serde_json::from_str(r#"{"name": null, "food": null, "age": 4}"#).unwrap();
    let updated = service.update_pet_by_id(1, patch).unwrap().unwrap();

    assert_eq!(updated, pet(1, "Rex", 1.0, 1.0, 4.0));
}

#[test]
fn non_finite_numbers_are_dropped_before_merge() {
    let (_dir, service) = open_service();
    service.birth("Rex").unwrap();

    let patch = PetPatch {
        food: Some(f64::NAN),
        weight: Some(f64::INFINITY),
        ..PetPatch::default()
    };
    let updated = service.update_pet_by_id(1, patch).unwrap().unwrap();

    assert_eq!(updated, pet(1, "Rex", 1.0, 1.0, 1.0));
}

#[test]
fn update_and_delete_of_missing_pet_report_not_found() {
    let (_dir, service) = open_service();

    assert_eq!(service.update_pet_by_id(3, PetPatch::default()).unwrap(), None);
    assert!(!service.delete_pet_by_id(3).unwrap());
    assert_eq!(service.get_pet_by_id(3).unwrap(), None);
}
