use serde::{Deserialize, Serialize};
use std::fmt;

use crate::framework::{Assemble, BuilderPipeline};

pub const MAIN_COURSE: &str = "MainCourse";
pub const SIDE_DISH: &str = "SideDish";
pub const BEVERAGE: &str = "Beverage";

/// A finished meal: its courses in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub courses: Vec<String>,
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Custom Meal: {}", self.courses.join(", "))
    }
}

/// Assembles a [`Meal`]. A meal without a main course is not a meal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MealAssembler;

impl Assemble<String> for MealAssembler {
    type Output = Meal;

    fn required_slots(&self) -> &[&'static str] {
        &[MAIN_COURSE]
    }

    fn assemble(&self, components: &[(String, String)]) -> Meal {
        Meal {
            courses: components.iter().map(|(_, dish)| dish.clone()).collect(),
        }
    }
}

/// Builder pipeline for meals.
pub type MealBuilder = BuilderPipeline<String, MealAssembler>;

pub fn meal_builder() -> MealBuilder {
    MealBuilder::with_assembler(MealAssembler)
}
