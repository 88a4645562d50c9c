pub mod fallback;
pub mod model;
pub mod recipes;
pub mod repo;
pub mod resolver;
pub mod slot;

pub use model::{FoodItem, FoodKey, MealItem, NewFoodItem, Nutrition};
pub use recipes::{RecipeSource, SpoonacularClient};
pub use repo::{FoodStore, PgFoodStore};
pub use resolver::{MealContentResolver, SlotRequest};
pub use slot::SlotType;
