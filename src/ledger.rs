//! The ledger consistency engine.
//!
//! Every expense mutation must adjust the owning category's `spent_amount`
//! aggregate in the same atomic unit, and every category deletion must
//! detach the expenses that reference it. The [Ledger] engine is the one
//! place those rules are enforced: it validates the acting user and the
//! input, assigns fresh IDs, and delegates the combined writes to a
//! [LedgerStore] so that no partial effect is ever observable.

use crate::{
    Error, IdGenerator,
    models::{BudgetCategory, CategoryName, DatabaseID, Expense, ExpenseBuilder, UserID},
    stores::{CategoryStore, LedgerStore, UserStore},
};

/// Maintains budget categories and expenses, keeping each category's
/// `spent_amount` equal to the sum of the amounts of the expenses that
/// reference it, clamped at zero.
///
/// The clamp is a deliberate safety floor: concurrent adjustments racing on
/// the same category can in principle drift, and flooring at zero bounds the
/// damage so a negative balance never surfaces.
///
/// Operations that act on a missing expense return `Ok(false)` rather than
/// an error; a missing *user* is [Error::MissingUser] and means the session
/// is stale, so callers must force re-authentication rather than retry.
#[derive(Debug, Clone)]
pub struct Ledger<L, C, U> {
    ledger_store: L,
    category_store: C,
    user_store: U,
    ids: IdGenerator,
}

impl<L, C, U> Ledger<L, C, U>
where
    L: LedgerStore,
    C: CategoryStore,
    U: UserStore,
{
    /// Create a ledger engine over the given stores.
    ///
    /// The stores must share one backing database, otherwise the atomicity
    /// of the combined writes is meaningless.
    pub fn new(ledger_store: L, category_store: C, user_store: U) -> Self {
        Self {
            ledger_store,
            category_store,
            user_store,
            ids: IdGenerator::new(),
        }
    }

    /// Create a new budget category with nothing spent against it.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if `user_id` does not refer to an
    /// existing user.
    pub fn create_category(
        &mut self,
        user_id: UserID,
        name: CategoryName,
        max_amount: f64,
    ) -> Result<BudgetCategory, Error> {
        self.ensure_user(user_id)?;

        let category = BudgetCategory {
            id: self.ids.generate(),
            user_id,
            name,
            max_amount,
            spent_amount: 0.0,
        };
        tracing::debug!("creating category {} for user {user_id}", category.id);

        self.category_store.create(category)
    }

    /// Replace a category's fields wholesale. Returns false if the category
    /// was not found.
    ///
    /// Writing `spent_amount` here is a one-time manual override of the
    /// derived aggregate; subsequent expense mutations adjust incrementally
    /// from the overridden value.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if the category's user does not exist.
    pub fn update_category(&mut self, category: BudgetCategory) -> Result<bool, Error> {
        self.ensure_user(category.user_id)?;

        self.category_store.update(category)
    }

    /// Delete a category and leave the expenses that referenced it
    /// uncategorized. Returns false if the category was not found.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if `user_id` does not refer to an
    /// existing user.
    pub fn delete_category(
        &mut self,
        category_id: DatabaseID,
        user_id: UserID,
    ) -> Result<bool, Error> {
        self.ensure_user(user_id)?;
        tracing::debug!("deleting category {category_id} for user {user_id}");

        self.ledger_store.delete_category(category_id, user_id)
    }

    /// Record a new expense and count its amount into its category's spent
    /// total.
    ///
    /// If the builder references a category that does not exist, the expense
    /// is still recorded and the aggregate step is a no-op: a dangling
    /// category reference is tolerated, not an error.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if the builder's user does not exist, or
    /// [Error::NonPositiveAmount] if the amount is zero or negative.
    pub fn create_expense(&mut self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        self.ensure_user(builder.user_id)?;
        if builder.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(builder.amount));
        }

        let expense = builder.finalize(self.ids.generate());
        tracing::debug!(
            "creating expense {} of {} for user {}",
            expense.id,
            expense.amount,
            expense.user_id
        );

        self.ledger_store.create_expense(expense)
    }

    /// Replace an expense's fields and reconcile the category aggregates.
    /// Returns false, with no effects, if the expense was not found.
    ///
    /// Moving the expense between categories subtracts the old amount from
    /// the old category and adds the new amount to the new one; an amount
    /// change within one category applies only the delta.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if the expense's user does not exist, or
    /// [Error::NonPositiveAmount] if the new amount is zero or negative.
    pub fn update_expense(&mut self, expense: Expense) -> Result<bool, Error> {
        self.ensure_user(expense.user_id)?;
        if expense.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(expense.amount));
        }
        tracing::debug!("updating expense {} for user {}", expense.id, expense.user_id);

        self.ledger_store.update_expense(expense)
    }

    /// Delete an expense and subtract its amount from its category's spent
    /// total. Returns false if the expense was not found.
    ///
    /// # Errors
    /// Returns [Error::MissingUser] if `user_id` does not refer to an
    /// existing user.
    pub fn delete_expense(
        &mut self,
        expense_id: DatabaseID,
        user_id: UserID,
    ) -> Result<bool, Error> {
        self.ensure_user(user_id)?;
        tracing::debug!("deleting expense {expense_id} for user {user_id}");

        self.ledger_store.delete_expense(expense_id, user_id)
    }

    /// Check that the acting user still exists in the store.
    fn ensure_user(&self, user_id: UserID) -> Result<(), Error> {
        match self.user_store.get(user_id) {
            Ok(_) => Ok(()),
            Err(Error::NotFound) => Err(Error::MissingUser),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod ledger_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{CategoryName, DatabaseID, Expense, PasswordHash, User, UserID, Username},
        stores::{
            CategoryStore, ExpenseStore, UserStore,
            sqlite::{
                SQLiteCategoryStore, SQLiteExpenseStore, SQLiteLedgerStore, SQLiteUserStore,
            },
        },
    };

    use super::Ledger;

    type TestLedger = Ledger<SQLiteLedgerStore, SQLiteCategoryStore, SQLiteUserStore>;

    struct Fixture {
        ledger: TestLedger,
        categories: SQLiteCategoryStore,
        expenses: SQLiteExpenseStore,
        user_id: UserID,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let user = SQLiteUserStore::new(connection.clone())
            .create(User::new(
                UserID::new(1),
                Username::new_unchecked("alice"),
                PasswordHash::from_raw_password("hunter2"),
            ))
            .unwrap();

        Fixture {
            ledger: Ledger::new(
                SQLiteLedgerStore::new(connection.clone()),
                SQLiteCategoryStore::new(connection.clone()),
                SQLiteUserStore::new(connection.clone()),
            ),
            categories: SQLiteCategoryStore::new(connection.clone()),
            expenses: SQLiteExpenseStore::new(connection),
            user_id: user.id(),
        }
    }

    fn spent(fixture: &Fixture, category_id: DatabaseID) -> f64 {
        fixture
            .categories
            .get(category_id, fixture.user_id)
            .unwrap()
            .spent_amount
    }

    #[test]
    fn new_category_starts_with_nothing_spent() {
        let mut fixture = get_fixture();

        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();

        assert_eq!(category.spent_amount, 0.0);
        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn creating_expenses_accumulates_the_category_total() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();

        fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();
        assert_eq!(spent(&fixture, category.id), 120.0);

        fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Takeaway", 30.0, date!(2025 - 06 - 03))
                    .category_id(Some(category.id)),
            )
            .unwrap();
        assert_eq!(spent(&fixture, category.id), 150.0);
    }

    #[test]
    fn shrinking_an_expense_applies_only_the_delta() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let mut expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();
        fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Takeaway", 30.0, date!(2025 - 06 - 03))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        expense.amount = 80.0;

        assert_eq!(fixture.ledger.update_expense(expense), Ok(true));
        assert_eq!(spent(&fixture, category.id), 110.0);
    }

    #[test]
    fn recategorizing_moves_the_amount_between_categories() {
        let mut fixture = get_fixture();
        let food = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let transport = fixture
            .ledger
            .create_category(
                fixture.user_id,
                CategoryName::new_unchecked("Transport"),
                200.0,
            )
            .unwrap();
        let mut expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Fuel", 60.0, date!(2025 - 06 - 02))
                    .category_id(Some(food.id)),
            )
            .unwrap();

        let total_before = spent(&fixture, food.id) + spent(&fixture, transport.id);
        expense.category_id = Some(transport.id);

        assert_eq!(fixture.ledger.update_expense(expense), Ok(true));
        assert_eq!(spent(&fixture, food.id), 0.0);
        assert_eq!(spent(&fixture, transport.id), 60.0);
        // Conservation: the sum across both categories is unchanged.
        assert_eq!(
            spent(&fixture, food.id) + spent(&fixture, transport.id),
            total_before
        );
    }

    #[test]
    fn detaching_an_expense_from_its_category_subtracts_its_amount() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let mut expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        expense.category_id = None;

        assert_eq!(fixture.ledger.update_expense(expense), Ok(true));
        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn deleting_an_expense_subtracts_its_amount() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();
        fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Takeaway", 30.0, date!(2025 - 06 - 03))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        assert_eq!(
            fixture.ledger.delete_expense(expense.id, fixture.user_id),
            Ok(true)
        );
        assert_eq!(spent(&fixture, category.id), 30.0);
    }

    #[test]
    fn deleting_an_expense_twice_reports_false_and_adjusts_once() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        assert_eq!(
            fixture.ledger.delete_expense(expense.id, fixture.user_id),
            Ok(true)
        );
        assert_eq!(
            fixture.ledger.delete_expense(expense.id, fixture.user_id),
            Ok(false)
        );
        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn aggregate_is_floored_at_zero_when_a_deletion_overshoots() {
        let mut fixture = get_fixture();
        let mut category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 50.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        // Manual override drags the aggregate below the recorded expense.
        category.spent_amount = 10.0;
        assert_eq!(fixture.ledger.update_category(category.clone()), Ok(true));

        assert_eq!(
            fixture.ledger.delete_expense(expense.id, fixture.user_id),
            Ok(true)
        );
        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn deleting_a_category_detaches_its_expenses() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();
        let expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(category.id)),
            )
            .unwrap();

        assert_eq!(
            fixture.ledger.delete_category(category.id, fixture.user_id),
            Ok(true)
        );
        assert_eq!(
            fixture.categories.get(category.id, fixture.user_id),
            Err(Error::NotFound)
        );

        let listed = fixture.expenses.get_by_user(fixture.user_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, expense.id);
        assert_eq!(listed[0].category_id, None);
    }

    #[test]
    fn deleting_a_missing_category_returns_false() {
        let mut fixture = get_fixture();

        assert_eq!(
            fixture.ledger.delete_category(404, fixture.user_id),
            Ok(false)
        );
    }

    #[test]
    fn expense_against_a_dangling_category_is_still_recorded() {
        let mut fixture = get_fixture();

        let expense = fixture
            .ledger
            .create_expense(
                Expense::build(fixture.user_id, "Groceries", 120.0, date!(2025 - 06 - 02))
                    .category_id(Some(404)),
            )
            .unwrap();

        let retrieved = fixture.expenses.get(expense.id, fixture.user_id).unwrap();
        assert_eq!(retrieved.amount, 120.0);
        assert_eq!(retrieved.category_id, Some(404));
    }

    #[test]
    fn uncategorized_expense_affects_no_aggregate() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();

        fixture
            .ledger
            .create_expense(Expense::build(
                fixture.user_id,
                "Groceries",
                120.0,
                date!(2025 - 06 - 02),
            ))
            .unwrap();

        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn updating_a_missing_expense_returns_false_with_no_effects() {
        let mut fixture = get_fixture();
        let category = fixture
            .ledger
            .create_category(fixture.user_id, CategoryName::new_unchecked("Food"), 500.0)
            .unwrap();

        let phantom = Expense::build(fixture.user_id, "Phantom", 75.0, date!(2025 - 06 - 02))
            .category_id(Some(category.id))
            .finalize(404);

        assert_eq!(fixture.ledger.update_expense(phantom), Ok(false));
        assert_eq!(spent(&fixture, category.id), 0.0);
    }

    #[test]
    fn operations_for_an_unknown_user_fail_with_missing_user() {
        let mut fixture = get_fixture();
        let stale_user = UserID::new(999);

        assert_eq!(
            fixture.ledger.create_category(
                stale_user,
                CategoryName::new_unchecked("Food"),
                500.0
            ),
            Err(Error::MissingUser)
        );
        assert_eq!(
            fixture.ledger.create_expense(Expense::build(
                stale_user,
                "Groceries",
                120.0,
                date!(2025 - 06 - 02)
            )),
            Err(Error::MissingUser)
        );
        assert_eq!(
            fixture.ledger.delete_expense(1, stale_user),
            Err(Error::MissingUser)
        );
    }

    #[test]
    fn non_positive_amounts_are_rejected_before_writing() {
        let mut fixture = get_fixture();

        let result = fixture.ledger.create_expense(Expense::build(
            fixture.user_id,
            "Groceries",
            0.0,
            date!(2025 - 06 - 02),
        ));

        assert_eq!(result, Err(Error::NonPositiveAmount(0.0)));
        assert!(fixture.expenses.get_by_user(fixture.user_id).unwrap().is_empty());
    }

    #[test]
    fn expense_listing_is_newest_first() {
        let mut fixture = get_fixture();

        fixture
            .ledger
            .create_expense(Expense::build(
                fixture.user_id,
                "Older",
                10.0,
                date!(2025 - 06 - 01),
            ))
            .unwrap();
        fixture
            .ledger
            .create_expense(Expense::build(
                fixture.user_id,
                "Newer",
                20.0,
                date!(2025 - 06 - 03),
            ))
            .unwrap();

        let listed = fixture.expenses.get_by_user(fixture.user_id).unwrap();

        let names: Vec<_> = listed.iter().map(|expense| expense.name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }
}
