use crate::schema::{Recipe, RecipeStep};

/// Walks an accepted recipe's procedure one step at a time.
#[derive(Debug, Clone)]
pub struct StepCursor<'a> {
    steps: &'a [RecipeStep],
    position: usize,
}

impl<'a> StepCursor<'a> {
    pub fn new(recipe: &'a Recipe) -> Self {
        Self {
            steps: &recipe.steps,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&'a RecipeStep> {
        self.steps.get(self.position)
    }

    /// Zero-based index of the current step.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    pub fn advance(&mut self) -> Option<&'a RecipeStep> {
        if self.is_last() {
            return None;
        }
        self.position += 1;
        self.current()
    }

    pub fn back(&mut self) -> Option<&'a RecipeStep> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.current()
    }
}
