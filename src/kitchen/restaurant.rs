use std::sync::Arc;
use tracing::instrument;

use super::meal::{meal_builder, Meal, MealAssembler, BEVERAGE, MAIN_COURSE, SIDE_DISH};
use crate::framework::{BuilderPipeline, CreationError, Director};

/// Director that orders a three-course meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub main_course: String,
    pub side_dish: String,
    pub beverage: String,
}

impl Default for Restaurant {
    fn default() -> Self {
        Self::new("Burger", "Fries", "Coke")
    }
}

impl Restaurant {
    pub fn new(
        main_course: impl Into<String>,
        side_dish: impl Into<String>,
        beverage: impl Into<String>,
    ) -> Self {
        Self {
            main_course: main_course.into(),
            side_dish: side_dish.into(),
            beverage: beverage.into(),
        }
    }

    /// Runs the recipe on a fresh meal builder.
    #[instrument(skip(self))]
    pub fn create_custom_meal(&self) -> Result<Arc<Meal>, CreationError> {
        self.construct(meal_builder())
    }
}

impl Director<String, MealAssembler> for Restaurant {
    fn direct(
        &self,
        pipeline: &mut BuilderPipeline<String, MealAssembler>,
    ) -> Result<(), CreationError> {
        pipeline
            .add_component(MAIN_COURSE, self.main_course.clone())?
            .add_component(SIDE_DISH, self.side_dish.clone())?
            .add_component(BEVERAGE, self.beverage.clone())?;
        Ok(())
    }
}
