use petstore_core::{
    next_pet_id, JsonPetRepository, Pet, PetPatch, PetProperties, PetRepository, RepoError,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn open_repo() -> (tempfile::TempDir, PathBuf, JsonPetRepository) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pets.json");
    let repo = JsonPetRepository::open(&path).unwrap();
    (dir, path, repo)
}

fn props(name: &str, food: f64, weight: f64, age: f64) -> PetProperties {
    PetProperties {
        name: name.to_string(),
        food,
        weight,
        age,
    }
}

#[test]
fn create_assigns_increasing_ids_starting_at_one() {
    let (_dir, _path, repo) = open_repo();

    let mut last_id = 0;
    for index in 0..5 {
        let pet = repo
            .create_pet(props(&format!("pet-{index}"), 1.0, 1.0, 1.0))
            .unwrap();
        if index == 0 {
            assert_eq!(pet.id, 1);
        }
        assert!(pet.id > last_id);
        last_id = pet.id;
    }
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, _path, repo) = open_repo();

    let created = repo.create_pet(props("Rex", 2.5, 10.0, 3.0)).unwrap();
    let loaded = repo.get_pet(created.id).unwrap().unwrap();

    assert_eq!(loaded, Pet::from_properties(created.id, props("Rex", 2.5, 10.0, 3.0)));
}

#[test]
fn list_on_empty_collection_returns_empty_vec() {
    let (_dir, _path, repo) = open_repo();
    assert_eq!(repo.list_pets().unwrap(), Vec::<Pet>::new());
}

#[test]
fn get_missing_returns_none() {
    let (_dir, _path, repo) = open_repo();
    repo.create_pet(props("Rex", 1.0, 1.0, 1.0)).unwrap();
    assert!(repo.get_pet(42).unwrap().is_none());
}

#[test]
fn empty_patch_leaves_record_unchanged() {
    let (_dir, _path, repo) = open_repo();
    let created = repo.create_pet(props("Rex", 3.0, 4.0, 5.0)).unwrap();

    let updated = repo
        .update_pet(created.id, &PetPatch::default())
        .unwrap()
        .unwrap();

    assert_eq!(updated, created);
    assert_eq!(repo.get_pet(created.id).unwrap().unwrap(), created);
}

#[test]
fn patch_changes_only_supplied_fields() {
    let (_dir, _path, repo) = open_repo();
    let created = repo.create_pet(props("Rex", 3.0, 4.0, 5.0)).unwrap();

    let patch = PetPatch {
        food: Some(5.0),
        ..PetPatch::default()
    };
    let updated = repo.update_pet(created.id, &patch).unwrap().unwrap();

    assert_eq!(updated.food, 5.0);
    assert_eq!(updated.name, "Rex");
    assert_eq!(updated.weight, 4.0);
    assert_eq!(updated.age, 5.0);
    assert_eq!(repo.get_pet(created.id).unwrap().unwrap(), updated);
}

#[test]
fn update_keeps_position_in_collection() {
    let (_dir, _path, repo) = open_repo();
    repo.create_pet(props("a", 1.0, 1.0, 1.0)).unwrap();
    repo.create_pet(props("b", 1.0, 1.0, 1.0)).unwrap();
    repo.create_pet(props("c", 1.0, 1.0, 1.0)).unwrap();

    let patch = PetPatch {
        name: Some("b2".to_string()),
        ..PetPatch::default()
    };
    repo.update_pet(2, &patch).unwrap().unwrap();

    let names: Vec<_> = repo
        .list_pets()
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(names, vec!["a", "b2", "c"]);
}

#[test]
fn update_missing_returns_none_without_writing() {
    let (_dir, path, repo) = open_repo();
    repo.create_pet(props("Rex", 1.0, 1.0, 1.0)).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let patch = PetPatch {
        age: Some(9.0),
        ..PetPatch::default()
    };
    assert!(repo.update_pet(99, &patch).unwrap().is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn delete_then_get_returns_none() {
    let (_dir, _path, repo) = open_repo();
    let rex = repo.create_pet(props("Rex", 1.0, 1.0, 1.0)).unwrap();
    let fido = repo.create_pet(props("Fido", 1.0, 1.0, 1.0)).unwrap();

    assert!(repo.delete_pet(rex.id).unwrap());
    assert!(repo.get_pet(rex.id).unwrap().is_none());
    assert_eq!(repo.list_pets().unwrap(), vec![fido]);
}

#[test]
fn delete_missing_returns_false_and_keeps_collection() {
    let (_dir, _path, repo) = open_repo();
    repo.create_pet(props("Rex", 1.0, 1.0, 1.0)).unwrap();
    let before = repo.list_pets().unwrap();

    assert!(!repo.delete_pet(7).unwrap());
    assert_eq!(repo.list_pets().unwrap(), before);
}

#[test]
fn ids_follow_max_rule_after_deletes() {
    let (_dir, _path, repo) = open_repo();
    for name in ["a", "b", "c"] {
        repo.create_pet(props(name, 1.0, 1.0, 1.0)).unwrap();
    }

    assert!(repo.delete_pet(2).unwrap());
    assert_eq!(repo.create_pet(props("d", 1.0, 1.0, 1.0)).unwrap().id, 4);

    assert!(repo.delete_pet(4).unwrap());
    assert_eq!(repo.create_pet(props("e", 1.0, 1.0, 1.0)).unwrap().id, 4);

    for id in [1, 3, 4] {
        assert!(repo.delete_pet(id).unwrap());
    }
    assert_eq!(repo.create_pet(props("f", 1.0, 1.0, 1.0)).unwrap().id, 1);
}

#[test]
fn next_pet_id_uses_maximum_not_length() {
    let pets = vec![
        Pet::from_properties(10, props("a", 1.0, 1.0, 1.0)),
        Pet::from_properties(3, props("b", 1.0, 1.0, 1.0)),
    ];
    assert_eq!(next_pet_id(&pets).unwrap(), 11);
    assert_eq!(next_pet_id(&[]).unwrap(), 1);
}

#[test]
fn create_after_maximum_id_reports_exhaustion() {
    let (_dir, path, repo) = open_repo();
    let seeded = Pet::from_properties(u64::MAX, props("last", 1.0, 1.0, 1.0));
    fs::write(&path, serde_json::to_string(&vec![seeded.clone()]).unwrap()).unwrap();

    let err = repo.create_pet(props("next", 1.0, 1.0, 1.0)).unwrap_err();

    assert!(matches!(err, RepoError::IdExhausted));
    assert_eq!(repo.list_pets().unwrap(), vec![seeded]);
}

#[test]
fn create_rejects_non_finite_numbers_and_keeps_file_readable() {
    let (_dir, path, repo) = open_repo();
    repo.create_pet(props("Rex", 1.0, 1.0, 1.0)).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = repo
        .create_pet(props("Ghost", f64::NAN, 1.0, 1.0))
        .unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("food")));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(repo.list_pets().unwrap().len(), 1);
}

#[test]
fn update_rejects_non_finite_numbers_and_keeps_record() {
    let (_dir, _path, repo) = open_repo();
    let rex = repo.create_pet(props("Rex", 1.0, 2.0, 3.0)).unwrap();

    let patch = PetPatch {
        weight: Some(f64::INFINITY),
        ..PetPatch::default()
    };
    let err = repo.update_pet(rex.id, &patch).unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("weight")));
    assert_eq!(repo.get_pet(rex.id).unwrap(), Some(rex));
}

#[test]
fn malformed_file_propagates_store_error() {
    let (_dir, path, repo) = open_repo();
    fs::write(&path, "[{\"id\": \"one\"}]").unwrap();

    assert!(matches!(repo.list_pets(), Err(RepoError::Store(_))));
    assert!(matches!(repo.delete_pet(1), Err(RepoError::Store(_))));
    assert!(matches!(
        repo.create_pet(props("Rex", 1.0, 1.0, 1.0)),
        Err(RepoError::Store(_))
    ));
}

#[test]
fn concurrent_updates_through_separate_handles_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pets.json");
    let seed = JsonPetRepository::open(&path).unwrap();
    let pet = seed.create_pet(props("Rex", 0.0, 0.0, 0.0)).unwrap();

    let first = Arc::new(JsonPetRepository::open(&path).unwrap());
    let second = Arc::new(JsonPetRepository::open(dir.path().join(".").join("pets.json")).unwrap());

    let mut workers = Vec::new();
    for (repo, field) in [(first, "food"), (second, "weight")] {
        workers.push(thread::spawn(move || {
            for step in 1..=25 {
                let value = f64::from(step);
                let patch = match field {
                    "food" => PetPatch {
                        food: Some(value),
                        ..PetPatch::default()
                    },
                    _ => PetPatch {
                        weight: Some(value),
                        ..PetPatch::default()
                    },
                };
                repo.update_pet(pet.id, &patch).unwrap().unwrap();
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    let stored = seed.get_pet(pet.id).unwrap().unwrap();
    assert_eq!(stored.food, 25.0);
    assert_eq!(stored.weight, 25.0);
}
