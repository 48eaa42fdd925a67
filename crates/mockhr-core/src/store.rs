//! In-memory collections behind the mock API.
//!
//! One `Store` is constructed per process (or per test) and shared behind a
//! `tokio::sync::RwLock` in [`AppState`](crate::controllers::AppState).
//! Handlers take the lock for the whole read-modify-write sequence, which
//! serializes the two interleaving-sensitive invariants: the
//! {`Employee::department_id`, `Department::employee_count`} pair and the
//! per-account refresh-token sets.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::auth;
use crate::error::ApiError;
use crate::models::account::{Account, AccountStatus, Role};
use crate::models::{AppRequest, Department, Employee, RequestItem, Workflow, WorkflowStatus};
use crate::storage::AccountsFile;

/// The five collections plus one monotonic ID counter each.
#[derive(Debug)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub workflows: Vec<Workflow>,
    pub requests: Vec<AppRequest>,

    next_account_id: u64,
    next_employee_id: u64,
    next_department_id: u64,
    next_workflow_id: u64,
    next_request_id: u64,

    accounts_file: Option<AccountsFile>,
}

impl Store {
    /// Build a store with the fixed development data set.
    ///
    /// Accounts come from the persisted file when one is configured; if none
    /// were loaded, two pre-verified Active accounts are seeded (one Admin,
    /// one User) and persisted. ID counters start at `max(ids) + 1` per
    /// collection, including ids loaded from disk.
    pub fn bootstrap(accounts_file: Option<AccountsFile>) -> Result<Self, ApiError> {
        let departments = vec![
            Department {
                id: 1,
                name: "Engineering".to_string(),
                description: "Software development team".to_string(),
                employee_count: 1,
            },
            Department {
                id: 2,
                name: "Marketing".to_string(),
                description: "Marketing team".to_string(),
                employee_count: 1,
            },
        ];
        let employees = vec![
            seed_employee(1, "EMP001", 1, "Developer", 1, 2025, 1, 1),
            seed_employee(2, "EMP002", 2, "Designer", 2, 2025, 2, 1),
        ];
        let workflows = vec![Workflow {
            id: 1,
            employee_id: 1,
            kind: "Onboarding".to_string(),
            details: json!({ "task": "Setup workstation" }),
            status: WorkflowStatus::Pending,
            created: Utc::now(),
        }];
        let requests = vec![AppRequest {
            id: 1,
            employee_id: 2,
            kind: "Equipment".to_string(),
            request_items: vec![RequestItem {
                name: "Laptop".to_string(),
                quantity: 1,
            }],
            status: "Pending".to_string(),
            created: Utc::now(),
        }];

        let mut accounts = match &accounts_file {
            Some(file) => file.load()?,
            None => Vec::new(),
        };
        let seeded = accounts.is_empty();
        if seeded {
            accounts.push(seed_account(1, "admin@example.com", "admin", Role::Admin, Some(1))?);
            accounts.push(seed_account(2, "user@example.com", "user", Role::User, Some(2))?);
        }

        let store = Store {
            next_account_id: next_id(accounts.iter().map(|a| a.id)),
            next_employee_id: next_id(employees.iter().map(|e| e.id)),
            next_department_id: next_id(departments.iter().map(|d| d.id)),
            next_workflow_id: next_id(workflows.iter().map(|w| w.id)),
            next_request_id: next_id(requests.iter().map(|r| r.id)),
            accounts,
            employees,
            departments,
            workflows,
            requests,
            accounts_file,
        };
        if seeded {
            store.persist_accounts()?;
        }
        Ok(store)
    }

    // ── ID generators ──

    pub fn next_account_id(&mut self) -> u64 {
        let id = self.next_account_id;
        self.next_account_id += 1;
        id
    }

    pub fn next_employee_id(&mut self) -> u64 {
        let id = self.next_employee_id;
        self.next_employee_id += 1;
        id
    }

    pub fn next_department_id(&mut self) -> u64 {
        let id = self.next_department_id;
        self.next_department_id += 1;
        id
    }

    pub fn next_workflow_id(&mut self) -> u64 {
        let id = self.next_workflow_id;
        self.next_workflow_id += 1;
        id
    }

    pub fn next_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    // ── Persistence ──

    /// Write-through save of the accounts collection. Called by every
    /// handler that mutates accounts, before the response is built. A no-op
    /// when persistence is disabled.
    pub fn persist_accounts(&self) -> Result<(), ApiError> {
        match &self.accounts_file {
            Some(file) => file.save(&self.accounts),
            None => Ok(()),
        }
    }

    // ── Account lookups ──

    pub fn account(&self, id: u64) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: u64) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn admin_count(&self) -> usize {
        self.accounts.iter().filter(|a| a.role == Role::Admin).count()
    }

    // ── Employee / department lookups ──

    pub fn employee(&self, id: u64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn department(&self, id: u64) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn department_mut(&mut self, id: u64) -> Option<&mut Department> {
        self.departments.iter_mut().find(|d| d.id == id)
    }

    /// The employee acting for an account: the one referenced by
    /// `Account::employee_id`, or failing that the one whose `user_id`
    /// points back at the account.
    pub fn linked_employee_id(&self, account: &Account) -> Option<u64> {
        account
            .employee_id
            .filter(|id| self.employee(*id).is_some())
            .or_else(|| {
                self.employees
                    .iter()
                    .find(|e| e.user_id == account.id)
                    .map(|e| e.id)
            })
    }

    /// Move an employee's department counter contribution from `old` to
    /// `new`. Decrements floor at 0; callers must have checked that `new`
    /// exists before mutating anything.
    pub fn shift_department_counts(&mut self, old: u64, new: u64) {
        if old == new {
            return;
        }
        if let Some(dept) = self.department_mut(old) {
            dept.employee_count = dept.employee_count.saturating_sub(1);
        }
        if let Some(dept) = self.department_mut(new) {
            dept.employee_count += 1;
        }
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

#[allow(clippy::too_many_arguments)]
fn seed_employee(
    id: u64,
    code: &str,
    user_id: u64,
    position: &str,
    department_id: u64,
    y: i32,
    m: u32,
    d: u32,
) -> Employee {
    Employee {
        id,
        employee_code: code.to_string(),
        user_id,
        position: position.to_string(),
        department_id,
        hire_date: NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date"),
        status: "Active".to_string(),
    }
}

fn seed_account(
    id: u64,
    email: &str,
    password: &str,
    role: Role,
    employee_id: Option<u64>,
) -> Result<Account, ApiError> {
    Ok(Account {
        id,
        title: None,
        first_name: None,
        last_name: None,
        email: email.to_string(),
        password_hash: auth::hash_password(password)?,
        role,
        employee_id,
        status: AccountStatus::Active,
        is_verified: true,
        verification_token: None,
        reset_token: None,
        reset_token_expires: None,
        refresh_tokens: Vec::new(),
        created: Utc::now(),
        updated: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_seeds_fixed_dataset() {
        let store = Store::bootstrap(None).unwrap();

        assert_eq!(store.accounts.len(), 2);
        assert_eq!(store.accounts[0].email, "admin@example.com");
        assert_eq!(store.accounts[0].role, Role::Admin);
        assert!(store.accounts[0].is_verified);
        assert_eq!(store.accounts[1].role, Role::User);

        assert_eq!(store.employees.len(), 2);
        assert_eq!(store.departments.len(), 2);
        assert_eq!(store.workflows.len(), 1);
        assert_eq!(store.requests.len(), 1);

        // Counter invariant: each department's count matches its employees.
        for dept in &store.departments {
            let actual = store
                .employees
                .iter()
                .filter(|e| e.department_id == dept.id)
                .count() as u32;
            assert_eq!(dept.employee_count, actual);
        }
    }

    #[test]
    fn counters_start_past_seeded_ids() {
        let mut store = Store::bootstrap(None).unwrap();
        assert_eq!(store.next_account_id(), 3);
        assert_eq!(store.next_account_id(), 4);
        assert_eq!(store.next_employee_id(), 3);
        assert_eq!(store.next_department_id(), 3);
        assert_eq!(store.next_workflow_id(), 2);
        assert_eq!(store.next_request_id(), 2);
    }

    #[test]
    fn shift_counts_floors_at_zero_and_ignores_same_department() {
        let mut store = Store::bootstrap(None).unwrap();

        store.department_mut(1).unwrap().employee_count = 0;
        store.shift_department_counts(1, 2);
        assert_eq!(store.department(1).unwrap().employee_count, 0);
        assert_eq!(store.department(2).unwrap().employee_count, 2);

        store.shift_department_counts(2, 2);
        assert_eq!(store.department(2).unwrap().employee_count, 2);
    }

    #[test]
    fn linked_employee_falls_back_to_user_id() {
        let mut store = Store::bootstrap(None).unwrap();
        assert_eq!(store.linked_employee_id(&store.accounts[1].clone()), Some(2));

        // Stale forward link: fall back to the user_id back-reference.
        store.accounts[1].employee_id = Some(999);
        assert_eq!(store.linked_employee_id(&store.accounts[1].clone()), Some(2));

        // No link at all.
        store.accounts[1].employee_id = None;
        store.employees.retain(|e| e.user_id != 2);
        assert_eq!(store.linked_employee_id(&store.accounts[1].clone()), None);
    }
}
