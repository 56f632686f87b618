//! Field-by-field copies between the Pet entity and its DTO shapes.
//!
//! Overlays onto an existing row never touch `id` or `creation_date`; those
//! are assigned at creation and fixed for the lifetime of the row.

use chrono::{DateTime, Utc};

use crate::models::{CreatePetInput, PatchPetInput, Pet, PetView};

impl From<&Pet> for PetView {
    fn from(pet: &Pet) -> Self {
        PetView {
            id: pet.id,
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            color: pet.color.clone(),
            age: pet.age,
            weight: pet.weight,
            creation_date: pet.creation_date,
        }
    }
}

impl From<&Pet> for PatchPetInput {
    fn from(pet: &Pet) -> Self {
        PatchPetInput {
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            color: pet.color.clone(),
            age: pet.age,
            weight: pet.weight,
        }
    }
}

/// Builds a fresh row from validated create input plus the server-assigned
/// id and creation timestamp.
pub fn pet_from_input(id: i32, input: &CreatePetInput, creation_date: DateTime<Utc>) -> Pet {
    Pet {
        id,
        name: input.name.clone(),
        breed: input.breed.clone(),
        color: input.color.clone(),
        age: input.age,
        weight: input.weight,
        creation_date,
    }
}

/// Overwrites the writable fields of `pet` from replace input.
pub fn apply_create_input(pet: &mut Pet, input: &CreatePetInput) {
    pet.name = input.name.clone();
    pet.breed = input.breed.clone();
    pet.color = input.color.clone();
    pet.age = input.age;
    pet.weight = input.weight;
}

/// Overwrites the writable fields of `pet` from a validated patch snapshot.
pub fn apply_patch_input(pet: &mut Pet, input: &PatchPetInput) {
    pet.name = input.name.clone();
    pet.breed = input.breed.clone();
    pet.color = input.color.clone();
    pet.age = input.age;
    pet.weight = input.weight;
}
