#![expect(clippy::unwrap_used, reason = "test code")]

use stronger_core::{BodyWeightInput, NutritionInput};

use super::{create_test_storage, create_test_user, date};

fn meal(day: u32, calories: u32) -> NutritionInput {
    NutritionInput { date: date(2015, 3, day), calories, protein: 150, carbs: 300, fats: 70 }
}

#[test]
fn nutrition_crud() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");

    let record = storage.create_nutrition(user.id, &meal(1, 2500)).unwrap();
    assert_eq!(storage.get_nutrition(record.id).unwrap(), record);

    let updated = storage.update_nutrition(record.id, &meal(2, 2800)).unwrap();
    assert_eq!(updated.calories, 2800);
    assert_eq!(updated.date, date(2015, 3, 2));
    assert_eq!(updated.created_on, record.created_on);

    assert!(storage.delete_nutrition(record.id).unwrap());
    assert!(storage.get_nutrition(record.id).unwrap_err().is_not_found());
}

#[test]
fn nutrition_between_is_inclusive() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");
    for day in 1..=5 {
        storage.create_nutrition(user.id, &meal(day, 2000 + day * 100)).unwrap();
    }

    let window = storage
        .nutrition_between(user.id, Some(date(2015, 3, 2)), Some(date(2015, 3, 4)))
        .unwrap();
    let days: Vec<_> = window.iter().map(|n| n.date).collect();
    assert_eq!(days, [date(2015, 3, 4), date(2015, 3, 3), date(2015, 3, 2)]);

    assert_eq!(storage.nutrition_on(user.id, date(2015, 3, 5)).unwrap()[0].calories, 2500);
    assert_eq!(storage.nutrition_between(user.id, None, None).unwrap().len(), 5);
}

#[test]
fn most_frequent_nutrition_users_breaks_ties_by_name() {
    let (storage, _temp_dir) = create_test_storage();
    let zoe = create_test_user(&storage, "zoe");
    let adam = create_test_user(&storage, "adam");
    let bea = create_test_user(&storage, "bea");
    storage.create_nutrition(zoe.id, &meal(1, 2000)).unwrap();
    storage.create_nutrition(adam.id, &meal(1, 2000)).unwrap();
    storage.create_nutrition(bea.id, &meal(1, 2000)).unwrap();
    storage.create_nutrition(bea.id, &meal(2, 2000)).unwrap();

    let users = storage.most_frequent_nutrition_users(10).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["bea", "adam", "zoe"]);
}

#[test]
fn bodyweight_unique_per_user_and_date() {
    let (storage, _temp_dir) = create_test_storage();
    let alice = create_test_user(&storage, "alice");
    let bob = create_test_user(&storage, "bob");
    let input = BodyWeightInput { date: date(2015, 3, 1), weight: 80 };

    storage.create_bodyweight(alice.id, &input).unwrap();
    assert!(storage.create_bodyweight(alice.id, &input).unwrap_err().is_duplicate());
    storage.create_bodyweight(bob.id, &input).unwrap();
}

#[test]
fn current_bodyweight_is_latest_by_date() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");
    assert!(storage.current_bodyweight(user.id).unwrap().is_none());

    storage.create_bodyweight(user.id, &BodyWeightInput { date: date(2015, 3, 10), weight: 82 }).unwrap();
    storage.create_bodyweight(user.id, &BodyWeightInput { date: date(2015, 3, 1), weight: 80 }).unwrap();

    assert_eq!(storage.current_bodyweight(user.id).unwrap().unwrap().weight, 82);
    let history: Vec<u32> =
        storage.bodyweight_history(user.id).unwrap().iter().map(|b| b.weight).collect();
    assert_eq!(history, [82, 80]);
}

#[test]
fn updating_bodyweight_onto_taken_date_is_duplicate() {
    let (storage, _temp_dir) = create_test_storage();
    let user = create_test_user(&storage, "alice");
    storage.create_bodyweight(user.id, &BodyWeightInput { date: date(2015, 3, 1), weight: 80 }).unwrap();
    let second =
        storage.create_bodyweight(user.id, &BodyWeightInput { date: date(2015, 3, 2), weight: 81 }).unwrap();

    let err = storage
        .update_bodyweight(second.id, &BodyWeightInput { date: date(2015, 3, 1), weight: 81 })
        .unwrap_err();
    assert!(err.is_duplicate());
}
