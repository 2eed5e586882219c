use std::path::Path;

use chrono::Local;
use clap::Parser;
use tracing::warn;

use meal_week_planner::cli::{Cli, Command, FoodCommand, MealArgs, PersonMealArgs, parse_day_meal};
use meal_week_planner::error::Result;
use meal_week_planner::interface::{
    display_foods_to_use_up, display_recipes, display_week, prompt_yes_no, resolve_recipe,
};
use meal_week_planner::planner::{monday_of_week, start_of_planning_week, RandomSource, StdRandom};
use meal_week_planner::state::{
    load_recipes_csv, save_recipes, JsonFileStore, PlanningEngine, RecipeCatalog, RecipeFile,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or_default();

    match command {
        Command::Recipes => cmd_recipes(&cli.recipes),
        Command::ImportCsv { csv } => cmd_import_csv(&csv, &cli.recipes),
        command => {
            let mut session = Session::open(&cli)?;
            session.dispatch(command)
        }
    }
}

/// The engine for the requested week together with the store it saves to.
struct Session {
    engine: PlanningEngine,
    store: JsonFileStore,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let recipes_path = Path::new(&cli.recipes);
        let catalog = if recipes_path.exists() {
            RecipeFile::new(recipes_path).all_recipes()?
        } else {
            warn!(path = %cli.recipes, "recipe catalog not found, continuing without recipes");
            Vec::new()
        };

        let rng: Box<dyn RandomSource> = match cli.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_entropy()),
        };

        let start = match cli.week {
            Some(date) => monday_of_week(date),
            None => start_of_planning_week(Local::now().date_naive()),
        };

        let mut store = JsonFileStore::open(&cli.file)?;
        let mut engine = PlanningEngine::new(start, catalog, rng);
        engine.load(&mut store)?;

        Ok(Self { engine, store })
    }

    fn save(&mut self) -> Result<()> {
        self.engine.save(&mut self.store)
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Show { next, previous } => self.cmd_show(next, previous),
            Command::Populate { yes } => self.cmd_populate(yes),
            Command::Toggle(target) => self.cmd_toggle(&target),
            Command::Reason { target, text } => self.cmd_reason(&target, &text),
            Command::Quick { meal, off } => self.cmd_flag(&meal, !off, FlagKind::Quick),
            Command::Pin { meal, off } => self.cmd_flag(&meal, !off, FlagKind::Pinned),
            Command::Select { target, recipe } => self.cmd_select(&target, &recipe),
            Command::Remove(meal) => self.cmd_meal_edit(&meal, MealEdit::Remove),
            Command::Split(meal) => self.cmd_meal_edit(&meal, MealEdit::Split),
            Command::Join(meal) => self.cmd_meal_edit(&meal, MealEdit::Join),
            Command::Swap {
                first_day,
                first_slot,
                second_day,
                second_slot,
            } => self.cmd_swap(&first_day, &first_slot, &second_day, &second_slot),
            Command::Food { action } => self.cmd_food(action),
            Command::Recipes | Command::ImportCsv { .. } => Ok(()),
        }
    }

    /// Show the week, optionally stepping one week either way.
    fn cmd_show(&mut self, next: bool, previous: bool) -> Result<()> {
        if next {
            self.engine.go_to_next_week(&mut self.store)?;
        } else if previous {
            self.engine.go_to_previous_week(&mut self.store)?;
        }
        display_week(&self.engine);
        Ok(())
    }

    /// Regenerate every unpinned meal.
    fn cmd_populate(&mut self, yes: bool) -> Result<()> {
        if self.engine.catalog().is_empty() {
            println!("No recipes available. Add some to the recipe catalog first.");
            return Ok(());
        }

        self.engine.populate_meal_recipes();
        display_week(&self.engine);

        let save = yes || prompt_yes_no("Save this plan?", true)?;
        if save {
            self.save()?;
            println!("Plan saved.");
        }
        Ok(())
    }

    fn cmd_toggle(&mut self, target: &PersonMealArgs) -> Result<()> {
        let person = target.person()?;
        let day_meal = target.meal.day_meal(self.engine.week_start())?;

        self.engine.toggle_attendance(person, &day_meal);
        self.save()?;

        let state = if self.engine.is_attending(person, &day_meal) {
            "eating"
        } else {
            "not eating"
        };
        println!(
            "{} is {} {} on {}: {}",
            person,
            state,
            day_meal.slot.label(),
            day_meal.date.format("%a %d %b"),
            self.engine.serving_info(&day_meal)
        );
        Ok(())
    }

    fn cmd_reason(&mut self, target: &PersonMealArgs, text: &str) -> Result<()> {
        let person = target.person()?;
        let day_meal = target.meal.day_meal(self.engine.week_start())?;

        self.engine.set_reason(text, person, &day_meal);
        self.save()?;
        println!("{}", self.engine.serving_info(&day_meal));
        Ok(())
    }

    fn cmd_flag(&mut self, meal: &MealArgs, on: bool, kind: FlagKind) -> Result<()> {
        let day_meal = meal.day_meal(self.engine.week_start())?;
        match kind {
            FlagKind::Quick => self.engine.set_quick_meal(on, &day_meal),
            FlagKind::Pinned => self.engine.set_pinned(on, &day_meal),
        }
        self.save()?;
        println!(
            "{} {} {}",
            day_meal.slot.label(),
            day_meal.date.format("%a %d %b"),
            match (kind, on) {
                (FlagKind::Quick, true) => "marked quick",
                (FlagKind::Quick, false) => "no longer quick",
                (FlagKind::Pinned, true) => "pinned",
                (FlagKind::Pinned, false) => "unpinned",
            }
        );
        Ok(())
    }

    fn cmd_select(&mut self, target: &PersonMealArgs, input: &str) -> Result<()> {
        let person = target.person()?;
        let day_meal = target.meal.day_meal(self.engine.week_start())?;

        let Some(recipe) = resolve_recipe(self.engine.catalog(), input)? else {
            println!("Nothing selected.");
            return Ok(());
        };

        self.engine.select_recipe(recipe, person, &day_meal);
        self.save()?;
        println!("{}", self.engine.meal_description(&day_meal));
        Ok(())
    }

    fn cmd_meal_edit(&mut self, meal: &MealArgs, edit: MealEdit) -> Result<()> {
        let day_meal = meal.day_meal(self.engine.week_start())?;
        match edit {
            MealEdit::Remove => self.engine.remove_meal(&day_meal),
            MealEdit::Split => self.engine.split_meal(&day_meal),
            MealEdit::Join => self.engine.join_meal(&day_meal),
        }
        self.save()?;
        println!("{}", self.engine.meal_description(&day_meal));
        Ok(())
    }

    fn cmd_swap(
        &mut self,
        first_day: &str,
        first_slot: &str,
        second_day: &str,
        second_slot: &str,
    ) -> Result<()> {
        let week_start = self.engine.week_start();
        let first = parse_day_meal(first_day, first_slot, week_start)?;
        let second = parse_day_meal(second_day, second_slot, week_start)?;

        self.engine.swap_meals(&first, &second);
        self.save()?;
        println!(
            "{}: {}",
            first.slot.label(),
            self.engine.meal_description(&first)
        );
        println!(
            "{}: {}",
            second.slot.label(),
            self.engine.meal_description(&second)
        );
        Ok(())
    }

    fn cmd_food(&mut self, action: FoodCommand) -> Result<()> {
        match action {
            FoodCommand::Add { name, meal, frozen } => {
                let id = self.engine.add_food_to_use_up(&name, meal, frozen)?;
                self.save()?;
                println!("Added {} ({})", name.trim(), id);
            }
            FoodCommand::Update {
                id,
                name,
                meal,
                frozen,
            } => {
                self.engine.update_food_to_use_up(id, &name, meal, frozen)?;
                self.save()?;
                println!("Updated {}", id);
            }
            FoodCommand::Remove { id } => {
                let removed = self.engine.remove_food_to_use_up(id)?;
                self.save()?;
                println!("Removed {}", removed.name);
            }
            FoodCommand::List => display_foods_to_use_up(self.engine.foods_to_use_up()),
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum FlagKind {
    Quick,
    Pinned,
}

#[derive(Clone, Copy)]
enum MealEdit {
    Remove,
    Split,
    Join,
}

/// List the recipe catalog.
fn cmd_recipes(recipes_path: &str) -> Result<()> {
    let path = Path::new(recipes_path);
    if !path.exists() {
        eprintln!("Recipe catalog not found: {}", recipes_path);
        return Ok(());
    }

    let recipes = RecipeFile::new(path).all_recipes()?;
    display_recipes(&recipes);
    Ok(())
}

/// Convert a CSV recipe list into the JSON catalog.
fn cmd_import_csv(csv_path: &str, recipes_path: &str) -> Result<()> {
    let recipes = load_recipes_csv(csv_path)?;
    save_recipes(recipes_path, &recipes)?;
    println!("Imported {} recipes into {}", recipes.len(), recipes_path);
    Ok(())
}
