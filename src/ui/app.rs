use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::util::{clamp_cursor, format_amount, format_date, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};
use crate::boundary::Boundary;
use crate::config::UiConfig;
use crate::crud::{FieldSpec, FormState, FormValues, Record, Schema, Validator};
use crate::error::Error;
use crate::models::*;
use crate::notify::{ConfirmOptions, ConfirmRequest, ConfirmState, Notifier};
use crate::routes::{self, Route};
use crate::session::AuthContext;
use crate::store::Store;

/// Vehicles whose next service falls inside this window raise an alert.
pub(crate) const MAINTENANCE_WINDOW_DAYS: u64 = 7;
/// Goals this close to their deadline raise an alert.
const DEADLINE_WINDOW_DAYS: u64 = 30;
const RECENT_RENTALS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// What a submitted form applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormTarget {
    Login,
    Create(Route),
    Edit(Route, u32),
    Payment(u32),
    Contribution(u32),
}

impl FormTarget {
    pub(crate) fn route(&self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::Create(route) | Self::Edit(route, _) => *route,
            Self::Payment(_) => Route::Debts,
            Self::Contribution(_) => Route::Goals,
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    Delete { route: Route, id: u32, label: String },
    Overshoot { goal_id: u32, contribution: Contribution },
    ResetData,
    Logout,
}

/// Cursor, scroll offset and filters of one list page.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListView {
    pub(crate) index: usize,
    pub(crate) scroll: usize,
    pub(crate) query: crate::crud::Query,
}

static EMPTY_VIEW: LazyLock<ListView> = LazyLock::new(ListView::default);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Alert {
    pub(crate) severity: Severity,
    pub(crate) title: String,
    pub(crate) detail: String,
    pub(crate) route: Route,
}

#[derive(Debug, Clone)]
pub(crate) struct DashboardStats {
    pub(crate) fleet: FleetSummary,
    pub(crate) rentals: RentalSummary,
    pub(crate) finance: FinancialSummary,
    pub(crate) debts: DebtTotals,
    pub(crate) goals: GoalTotals,
    /// Personal balance plus goal savings minus what is still owed.
    pub(crate) net_position: Decimal,
}

/// Dashboard panels. `None` means the panel's boundary caught an error.
#[derive(Debug, Clone, Default)]
pub(crate) struct DashboardData {
    pub(crate) stats: Option<DashboardStats>,
    pub(crate) alerts: Option<Vec<Alert>>,
    pub(crate) recent: Vec<Rental>,
}

enum Submitted {
    Saved { message: String, detail: String },
    AwaitingConfirmation,
}

impl Submitted {
    fn saved(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Saved {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) route: Route,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    pub(crate) auth: AuthContext,
    pub(crate) store: Store,
    pub(crate) notifier: Notifier,

    pub(crate) views: HashMap<Route, ListView>,
    pub(crate) form: Option<FormState<FormTarget>>,
    pub(crate) pending: Option<ConfirmRequest<PendingAction>>,
    /// Contract text of the selected rental, shown as a popup.
    pub(crate) contract: Option<String>,

    pub(crate) page_boundary: Boundary,
    pub(crate) stats_boundary: Boundary,
    pub(crate) alerts_boundary: Boundary,
    pub(crate) dashboard: DashboardData,

    pub(crate) loading_until: Option<Instant>,
    loading_delay: Option<Duration>,
    confirm_timeout: Option<Duration>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(auth: AuthContext, store: Store, ui: &UiConfig, today: NaiveDate) -> Self {
        let mut app = Self {
            running: true,
            route: Route::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            auth,
            store,
            notifier: Notifier::default(),

            views: HashMap::new(),
            form: None,
            pending: None,
            contract: None,

            page_boundary: Boundary::page(),
            stats_boundary: Boundary::component(),
            alerts_boundary: Boundary::component(),
            dashboard: DashboardData::default(),

            loading_until: None,
            loading_delay: ui.loading_delay(),
            confirm_timeout: ui.confirm_timeout(),

            visible_rows: 20,
        };
        app.reset_views();
        app.navigate(Route::Dashboard);
        app
    }

    // ── Navigation ───────────────────────────────────────────

    /// Go to `requested`, following the route guard's redirects.
    pub(crate) fn navigate(&mut self, requested: Route) {
        let route = routes::resolve(requested, self.auth.state());
        if route != requested {
            tracing::debug!(from = requested.path(), to = route.path(), "route redirected");
        }
        self.route = route;
        self.page_boundary.reset();
        self.contract = None;
        self.form = None;
        self.input_mode = InputMode::Normal;
        self.status_message.clear();
        self.loading_until = self.loading_delay.map(|d| Instant::now() + d);

        match route {
            Route::Login => self.open_login(),
            Route::Dashboard => self.refresh_dashboard(),
            _ => {}
        }
    }

    /// Step through the sidebar items.
    pub(crate) fn cycle_route(&mut self, forward: bool) {
        let nav = Route::nav();
        let idx = nav.iter().position(|r| *r == self.route).unwrap_or(0);
        let next = if forward {
            (idx + 1) % nav.len()
        } else if idx == 0 {
            nav.len() - 1
        } else {
            idx - 1
        };
        self.navigate(nav[next]);
    }

    pub(crate) fn is_loading(&self, now: Instant) -> bool {
        self.auth.is_loading() || self.loading_until.is_some_and(|t| now < t)
    }

    /// Expire toasts, time out confirmations, end the loading view and
    /// follow the calendar date past midnight.
    pub(crate) fn tick(&mut self, now: Instant, today: NaiveDate) {
        self.notifier.tick(now);

        if today != self.today {
            tracing::info!(from = %self.today, to = %today, "date changed");
            self.today = today;
            self.refresh_dashboard();
        }

        if let Some(request) = self.pending.as_mut() {
            if request.poll(now) == Some(false) && request.state() == ConfirmState::TimedOut {
                tracing::info!(title = %request.options.title, "confirmation timed out");
                self.pending = None;
                self.input_mode = InputMode::Normal;
                self.notifier.info("Confirmation timed out", "Nothing was changed");
            }
        }

        if self.loading_until.is_some_and(|t| now >= t) {
            self.loading_until = None;
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn notify_error(&mut self, error: &Error) {
        self.notifier.error(error.title(), &error.messages().join("; "));
    }

    // ── List views ───────────────────────────────────────────

    pub(crate) fn reset_views(&mut self) {
        for route in Route::nav() {
            self.views.insert(*route, ListView::default());
        }
    }

    pub(crate) fn view_of(&self, route: Route) -> &ListView {
        self.views.get(&route).unwrap_or(&*EMPTY_VIEW)
    }

    pub(crate) fn view(&self) -> &ListView {
        self.view_of(self.route)
    }

    pub(crate) fn view_mut(&mut self) -> &mut ListView {
        self.views.entry(self.route).or_default()
    }

    /// Ids of the current page's records that pass its search and filters,
    /// in display order.
    pub(crate) fn visible_ids(&self) -> Vec<u32> {
        let query = &self.view().query;
        match self.route {
            Route::Vehicles => ids(self.store.vehicles.filtered(query)),
            Route::Rentals => ids(self.store.rentals.filtered(query)),
            Route::PersonalTransactions => ids(self.store.transactions.filtered(query)),
            Route::Debts => ids(self.store.debts.filtered(query)),
            Route::Goals => ids(self.store.goals.filtered(query)),
            Route::Login | Route::Dashboard | Route::Settings => Vec::new(),
        }
    }

    /// Settings rows matching the search text by key, section or value.
    pub(crate) fn visible_settings(&self) -> Vec<SettingEntry> {
        let needle = self.view_of(Route::Settings).query.search.trim().to_lowercase();
        self.store
            .settings
            .entries()
            .into_iter()
            .filter(|e| {
                needle.is_empty()
                    || e.key.contains(&needle)
                    || e.section.to_lowercase().contains(&needle)
                    || e.value.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub(crate) fn list_len(&self) -> usize {
        match self.route {
            Route::Settings => self.visible_settings().len(),
            _ => self.visible_ids().len(),
        }
    }

    pub(crate) fn selected_id(&self) -> Option<u32> {
        self.visible_ids().get(self.view().index).copied()
    }

    pub(crate) fn selected_setting(&self) -> Option<SettingEntry> {
        self.visible_settings().into_iter().nth(self.view().index)
    }

    pub(crate) fn move_down(&mut self) {
        let (len, page) = (self.list_len(), self.visible_rows);
        let view = self.view_mut();
        scroll_down(&mut view.index, &mut view.scroll, len, page);
    }

    pub(crate) fn move_up(&mut self) {
        let view = self.view_mut();
        scroll_up(&mut view.index, &mut view.scroll);
    }

    pub(crate) fn move_to_top(&mut self) {
        let view = self.view_mut();
        scroll_to_top(&mut view.index, &mut view.scroll);
    }

    pub(crate) fn move_to_bottom(&mut self) {
        let (len, page) = (self.list_len(), self.visible_rows);
        let view = self.view_mut();
        scroll_to_bottom(&mut view.index, &mut view.scroll, len, page);
    }

    pub(crate) fn set_search(&mut self, text: &str) {
        let view = self.view_mut();
        view.query.search = text.to_string();
        view.index = 0;
        view.scroll = 0;
    }

    pub(crate) fn set_filter(&mut self, facet: &str, value: &str) {
        let view = self.view_mut();
        view.query.set_facet(facet, value);
        view.index = 0;
        view.scroll = 0;
    }

    pub(crate) fn clear_filters(&mut self) {
        *self.view_mut() = ListView::default();
        self.search_input.clear();
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        let view = self.view_mut();
        clamp_cursor(&mut view.index, &mut view.scroll, len);
    }

    // ── Forms ────────────────────────────────────────────────

    fn open_form<S: Schema>(&mut self, schema: &S, title: String, values: FormValues, target: FormTarget) {
        let fields = schema.fields_for(&values);
        self.form = Some(FormState::new(title, fields, values, target));
        self.input_mode = InputMode::Editing;
    }

    fn open_login(&mut self) {
        let (email, password) = AuthContext::demo_credentials();
        let fields = vec![
            FieldSpec::text("email", "Email")
                .required()
                .default_value(email),
            FieldSpec::text("password", "Password")
                .required()
                .default_value(password),
        ];
        let values = FormValues::defaults(&fields);
        self.form = Some(FormState::new("Sign in", fields, values, FormTarget::Login));
        self.input_mode = InputMode::Editing;
    }

    fn rental_schema(&self, editing: Option<&Rental>) -> RentalSchema {
        let mut vehicles = RentableVehicle::from_fleet(self.store.vehicles.items());
        if let Some(rental) = editing {
            if !vehicles.iter().any(|v| v.id == rental.vehicle_id) {
                vehicles.push(RentableVehicle {
                    id: rental.vehicle_id,
                    plate: rental.vehicle_plate.clone(),
                    model: rental.vehicle_model.clone(),
                    daily_rate: rental.daily_rate,
                });
            }
        }
        RentalSchema {
            vehicles,
            today: self.today,
        }
    }

    pub(crate) fn open_create(&mut self) {
        let today = self.today;
        let target = FormTarget::Create(self.route);
        match self.route {
            Route::Vehicles => {
                let schema = VehicleSchema { today };
                self.open_form(&schema, new_title(&schema), schema.empty_form(), target);
            }
            Route::Rentals => {
                let schema = self.rental_schema(None);
                if schema.vehicles.is_empty() {
                    self.notifier
                        .warning("No vehicles available", "Every vehicle is rented or out of service");
                }
                self.open_form(&schema, new_title(&schema), schema.empty_form(), target);
            }
            Route::PersonalTransactions => {
                let schema = PersonalSchema { today };
                self.open_form(&schema, new_title(&schema), schema.empty_form(), target);
            }
            Route::Debts => {
                let schema = DebtSchema { today };
                self.open_form(&schema, new_title(&schema), schema.empty_form(), target);
            }
            Route::Goals => {
                let schema = GoalSchema { today };
                self.open_form(&schema, new_title(&schema), schema.empty_form(), target);
            }
            Route::Login | Route::Dashboard | Route::Settings => {
                self.set_status("Nothing to create on this page");
            }
        }
    }

    pub(crate) fn open_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status("Nothing selected");
            return;
        };
        let today = self.today;
        let target = FormTarget::Edit(self.route, id);
        match self.route {
            Route::Vehicles => {
                if let Some(v) = self.store.vehicles.get(id).cloned() {
                    let schema = VehicleSchema { today };
                    self.open_form(&schema, edit_title(&schema, id), schema.to_form(&v), target);
                }
            }
            Route::Rentals => {
                if let Some(r) = self.store.rentals.get(id).cloned() {
                    let schema = self.rental_schema(Some(&r));
                    self.open_form(&schema, edit_title(&schema, id), schema.to_form(&r), target);
                }
            }
            Route::PersonalTransactions => {
                if let Some(t) = self.store.transactions.get(id).cloned() {
                    let schema = PersonalSchema { today };
                    self.open_form(&schema, edit_title(&schema, id), schema.to_form(&t), target);
                }
            }
            Route::Debts => {
                if let Some(d) = self.store.debts.get(id).cloned() {
                    let schema = DebtSchema { today };
                    self.open_form(&schema, edit_title(&schema, id), schema.to_form(&d), target);
                }
            }
            Route::Goals => {
                if let Some(g) = self.store.goals.get(id).cloned() {
                    let schema = GoalSchema { today };
                    self.open_form(&schema, edit_title(&schema, id), schema.to_form(&g), target);
                }
            }
            Route::Login | Route::Dashboard | Route::Settings => {}
        }
    }

    /// Payment dialog for the selected debt.
    pub(crate) fn open_payment(&mut self) {
        if self.route != Route::Debts {
            self.set_status("Payments are registered on the Debts page");
            return;
        }
        let Some(debt) = self.selected_id().and_then(|id| self.store.debts.get(id)).cloned() else {
            self.set_status("Nothing selected");
            return;
        };
        if debt.status == DebtStatus::PaidOff {
            self.notify_error(&Error::business(format!("{} is already paid off", debt.description)));
            return;
        }
        let schema = PaymentSchema { today: self.today };
        let title = format!("Payment: {}", debt.description);
        self.open_form(&schema, title, schema.form_for(&debt), FormTarget::Payment(debt.id));
    }

    /// Add-value dialog for the selected goal.
    pub(crate) fn open_contribution(&mut self) {
        if self.route != Route::Goals {
            self.set_status("Values are added on the Goals page");
            return;
        }
        let Some(goal) = self.selected_id().and_then(|id| self.store.goals.get(id)).cloned() else {
            self.set_status("Nothing selected");
            return;
        };
        let schema = ContributionSchema { today: self.today };
        let title = format!("Add value: {}", goal.title);
        self.open_form(&schema, title, schema.empty_form(), FormTarget::Contribution(goal.id));
    }

    /// Re-run the schema's dependent-field rules after the focused field
    /// changed.
    pub(crate) fn form_changed(&mut self) {
        let Some((target, key)) = self
            .form
            .as_ref()
            .and_then(|f| f.focused().map(|field| (f.target, field.key)))
        else {
            return;
        };
        let today = self.today;
        match target {
            FormTarget::Create(Route::Rentals) => {
                let schema = self.rental_schema(None);
                self.sync_form(&schema, key);
            }
            FormTarget::Edit(Route::Rentals, id) => {
                let schema = self.rental_schema(self.store.rentals.get(id));
                self.sync_form(&schema, key);
            }
            FormTarget::Create(Route::PersonalTransactions)
            | FormTarget::Edit(Route::PersonalTransactions, _) => {
                self.sync_form(&PersonalSchema { today }, key);
            }
            _ => {}
        }
    }

    fn sync_form<S: Schema>(&mut self, schema: &S, key: &str) {
        if let Some(form) = self.form.as_mut() {
            schema.on_change(key, &mut form.values);
            let fields = schema.fields_for(&form.values);
            form.set_fields(fields);
        }
    }

    /// Esc in a dialog. The login form has nowhere to go back to.
    pub(crate) fn close_form(&mut self) {
        match self.form.as_mut() {
            Some(form) if form.target == FormTarget::Login => form.errors.clear(),
            Some(_) => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.set_status("Cancelled");
            }
            None => self.input_mode = InputMode::Normal,
        }
    }

    pub(crate) fn submit_form(&mut self) {
        let Some(mut form) = self.form.take() else {
            self.input_mode = InputMode::Normal;
            return;
        };

        let outcome = match form.target {
            FormTarget::Login => {
                self.submit_login(form);
                return;
            }
            FormTarget::Create(route) => self.create_record(route, &form.values),
            FormTarget::Edit(route, id) => self.update_record(route, id, &form.values),
            FormTarget::Payment(debt_id) => self.pay_debt(debt_id, &form.values),
            FormTarget::Contribution(goal_id) => self.contribute(goal_id, &form.values),
        };

        match outcome {
            Ok(Submitted::Saved { message, detail }) => {
                self.input_mode = InputMode::Normal;
                self.notifier.success(&message, &detail);
                self.clamp_selection();
                self.refresh_dashboard();
            }
            Ok(Submitted::AwaitingConfirmation) => {}
            Err(e) => {
                tracing::debug!(error = %e, "form rejected");
                form.errors = e.messages();
                self.notify_error(&e);
                self.form = Some(form);
            }
        }
    }

    fn submit_login(&mut self, mut form: FormState<FormTarget>) {
        let mut v = Validator::new(&form.values);
        let email = v.required("email", "Email");
        v.required("password", "Password");
        if let Err(e) = v.finish() {
            form.errors = e.messages();
            self.notify_error(&e);
            self.form = Some(form);
            return;
        }

        let password = form.values.get("password").to_string();
        let result = self.auth.login(&email, &password);
        if result.success {
            let name = result.user.map(|u| u.name).unwrap_or_default();
            self.navigate(Route::Dashboard);
            self.notifier.success("Login successful", &format!("Welcome, {name}"));
        } else {
            let message = result
                .error
                .unwrap_or_else(|| Error::Authentication.to_string());
            self.notifier.error(Error::Authentication.title(), &message);
            form.values.set("password", "");
            form.errors = vec![message];
            self.form = Some(form);
        }
    }

    fn create_record(&mut self, route: Route, values: &FormValues) -> crate::error::Result<Submitted> {
        let today = self.today;
        let id = match route {
            Route::Vehicles => self.store.vehicles.create(&VehicleSchema { today }, values)?,
            Route::Rentals => {
                let schema = self.rental_schema(None);
                self.store.rentals.create(&schema, values)?
            }
            Route::PersonalTransactions => self
                .store
                .transactions
                .create(&PersonalSchema { today }, values)?,
            Route::Debts => self.store.debts.create(&DebtSchema { today }, values)?,
            Route::Goals => self.store.goals.create(&GoalSchema { today }, values)?,
            Route::Login | Route::Dashboard | Route::Settings => {
                return Err(Error::business(format!("{route} has no records")));
            }
        };
        Ok(Submitted::saved(
            format!("{} created", entity_label(route)),
            format!("#{id}"),
        ))
    }

    fn update_record(&mut self, route: Route, id: u32, values: &FormValues) -> crate::error::Result<Submitted> {
        let today = self.today;
        match route {
            Route::Vehicles => self.store.vehicles.update(&VehicleSchema { today }, id, values)?,
            Route::Rentals => {
                let schema = self.rental_schema(self.store.rentals.get(id));
                self.store.rentals.update(&schema, id, values)?;
            }
            Route::PersonalTransactions => {
                self.store
                    .transactions
                    .update(&PersonalSchema { today }, id, values)?;
            }
            Route::Debts => self.store.debts.update(&DebtSchema { today }, id, values)?,
            Route::Goals => self.store.goals.update(&GoalSchema { today }, id, values)?,
            Route::Login | Route::Dashboard | Route::Settings => {
                return Err(Error::business(format!("{route} has no records")));
            }
        }
        Ok(Submitted::saved(
            format!("{} updated", entity_label(route)),
            format!("#{id}"),
        ))
    }

    fn pay_debt(&mut self, debt_id: u32, values: &FormValues) -> crate::error::Result<Submitted> {
        let today = self.today;
        let payment = PaymentSchema { today }.build(values, None)?;
        let amount = payment.amount;
        self.store
            .debts
            .update_with(debt_id, |debt| debt.register_payment(payment, today))?;
        let paid_off = self
            .store
            .debts
            .get(debt_id)
            .is_some_and(|d| d.status == DebtStatus::PaidOff);
        let message = if paid_off { "Debt paid off" } else { "Payment registered" };
        Ok(Submitted::saved(message, format_amount(amount)))
    }

    fn contribute(&mut self, goal_id: u32, values: &FormValues) -> crate::error::Result<Submitted> {
        let contribution = ContributionSchema { today: self.today }.build(values, None)?;
        let amount = contribution.amount;
        let draft = contribution.clone();
        match self
            .store
            .goals
            .update_with(goal_id, |goal| goal.add_value(draft, false))?
        {
            AddValueOutcome::Applied { reached_target } => Ok(value_added(amount, reached_target)),
            AddValueOutcome::NeedsConfirmation { percent } => {
                self.ask(
                    ConfirmOptions::ask(
                        "Value above target",
                        format!("This brings the goal to {percent}% of its target. Add it anyway?"),
                    ),
                    PendingAction::Overshoot {
                        goal_id,
                        contribution,
                    },
                );
                Ok(Submitted::AwaitingConfirmation)
            }
        }
    }

    // ── Confirmation ─────────────────────────────────────────

    pub(crate) fn ask(&mut self, options: ConfirmOptions, action: PendingAction) {
        let options = options.with_timeout(self.confirm_timeout);
        self.pending = Some(ConfirmRequest::new(options, action, Instant::now()));
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn request_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status("Nothing selected");
            return;
        };
        let route = self.route;
        let label = self.record_label(route, id);
        self.ask(
            ConfirmOptions::destructive(
                format!("Delete {}", entity_label(route).to_lowercase()),
                format!("Delete {label}? This cannot be undone."),
            ),
            PendingAction::Delete { route, id, label },
        );
    }

    fn record_label(&self, route: Route, id: u32) -> String {
        let label = match route {
            Route::Vehicles => self.store.vehicles.get(id).map(Vehicle::display_name),
            Route::Rentals => self
                .store
                .rentals
                .get(id)
                .map(|r| format!("rental #{} ({})", r.id, r.customer_name)),
            Route::PersonalTransactions => self
                .store
                .transactions
                .get(id)
                .map(|t| format!("'{}'", t.description)),
            Route::Debts => self.store.debts.get(id).map(|d| format!("'{}'", d.description)),
            Route::Goals => self.store.goals.get(id).map(|g| format!("'{}'", g.title)),
            Route::Login | Route::Dashboard | Route::Settings => None,
        };
        label.unwrap_or_else(|| format!("#{id}"))
    }

    /// Settle the open confirmation. The guarded action runs only on a yes.
    pub(crate) fn resolve_confirm(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        let Some(mut request) = self.pending.take() else {
            return;
        };
        if !request.resolve(confirmed) {
            return;
        }
        if confirmed {
            self.apply(request.into_action());
        } else {
            self.set_status("Cancelled");
        }
    }

    fn apply(&mut self, action: PendingAction) {
        let outcome = match action {
            PendingAction::Delete { route, id, label } => self
                .delete_record(route, id)
                .map(|()| Submitted::saved(format!("{} deleted", entity_label(route)), label)),
            PendingAction::Overshoot {
                goal_id,
                contribution,
            } => {
                let amount = contribution.amount;
                self.store
                    .goals
                    .update_with(goal_id, |goal| goal.add_value(contribution, true))
                    .map(|outcome| match outcome {
                        AddValueOutcome::Applied { reached_target } => {
                            value_added(amount, reached_target)
                        }
                        AddValueOutcome::NeedsConfirmation { .. } => Submitted::AwaitingConfirmation,
                    })
            }
            PendingAction::ResetData => {
                self.store.reset();
                self.reset_views();
                Ok(Submitted::saved("Data reset", "Example data restored"))
            }
            PendingAction::Logout => {
                self.auth.logout();
                self.navigate(Route::Dashboard);
                Ok(Submitted::saved("Logged out", "See you soon"))
            }
        };

        match outcome {
            Ok(Submitted::Saved { message, detail }) => {
                self.notifier.success(&message, &detail);
                self.clamp_selection();
                self.refresh_dashboard();
            }
            Ok(Submitted::AwaitingConfirmation) => {}
            Err(e) => self.notify_error(&e),
        }
    }

    fn delete_record(&mut self, route: Route, id: u32) -> crate::error::Result<()> {
        match route {
            Route::Vehicles => self.store.vehicles.remove(id).map(|_| ()),
            Route::Rentals => self.store.rentals.remove(id).map(|_| ()),
            Route::PersonalTransactions => self.store.transactions.remove(id).map(|_| ()),
            Route::Debts => self.store.debts.remove(id).map(|_| ()),
            Route::Goals => self.store.goals.remove(id).map(|_| ()),
            Route::Login | Route::Dashboard | Route::Settings => {
                Err(Error::business(format!("{route} has no records")))
            }
        }
    }

    // ── Domain actions on the selection ──────────────────────

    pub(crate) fn set_rental_status(&mut self, status: RentalStatus) -> crate::error::Result<u32> {
        let id = self.selected_on(Route::Rentals)?;
        self.store.rentals.update_with(id, |rental| {
            rental.set_status(status);
            Ok(())
        })?;
        self.refresh_dashboard();
        Ok(id)
    }

    pub(crate) fn update_goal_status(&mut self, f: fn(&mut Goal)) -> crate::error::Result<Goal> {
        let id = self.selected_on(Route::Goals)?;
        let goal = self.store.goals.update_with(id, |goal| {
            f(goal);
            Ok(goal.clone())
        })?;
        self.refresh_dashboard();
        Ok(goal)
    }

    pub(crate) fn show_contract(&mut self) -> crate::error::Result<()> {
        let id = self.selected_on(Route::Rentals)?;
        let rental = self.store.rentals.get(id).ok_or(Error::NotFound {
            entity: Rental::ENTITY,
            id,
        })?;
        self.contract = Some(contract_text(rental));
        self.notifier.info("Contract generated", &format!("Rental #{id}"));
        Ok(())
    }

    fn selected_on(&self, route: Route) -> crate::error::Result<u32> {
        if self.route != route {
            return Err(Error::business(format!("Only available on the {route} page")));
        }
        self.selected_id()
            .ok_or_else(|| Error::business("Nothing selected"))
    }

    // ── Dashboard ────────────────────────────────────────────

    /// Recompute every panel from the live store. Each fallible panel sits
    /// behind its own component boundary.
    pub(crate) fn refresh_dashboard(&mut self) {
        self.dashboard.stats = self.stats_boundary.catch(dashboard_stats(&self.store));
        self.dashboard.alerts = self
            .alerts_boundary
            .catch(dashboard_alerts(&self.store, self.today));
        self.dashboard.recent = recent_rentals(&self.store, RECENT_RENTALS);
    }

    /// Retry whichever boundary on the current page is showing a fallback.
    pub(crate) fn retry(&mut self) {
        if self.page_boundary.is_errored() {
            self.page_boundary.retry();
        }
        if self.route == Route::Dashboard {
            self.stats_boundary.retry();
            self.alerts_boundary.retry();
            self.refresh_dashboard();
        }
    }

    pub(crate) fn go_home(&mut self) {
        if let Some(route) = self.page_boundary.go_home() {
            self.navigate(route);
        }
    }
}

fn ids<T: Record>(records: Vec<&T>) -> Vec<u32> {
    records.into_iter().map(Record::id).collect()
}

fn new_title<S: Schema>(schema: &S) -> String {
    format!("New {}", schema.title().to_lowercase())
}

fn edit_title<S: Schema>(schema: &S, id: u32) -> String {
    format!("Edit {} #{id}", schema.title().to_lowercase())
}

pub(crate) fn entity_label(route: Route) -> &'static str {
    match route {
        Route::Vehicles => "Vehicle",
        Route::Rentals => "Rental",
        Route::PersonalTransactions => "Transaction",
        Route::Debts => "Debt",
        Route::Goals => "Goal",
        Route::Login | Route::Dashboard | Route::Settings => "Record",
    }
}

fn value_added(amount: Decimal, reached_target: bool) -> Submitted {
    if reached_target {
        Submitted::saved("Goal reached!", "Target amount achieved")
    } else {
        Submitted::saved("Value added", format_amount(amount))
    }
}

pub(crate) fn dashboard_stats(store: &Store) -> Result<DashboardStats> {
    let finance = FinancialSummary::of(store.transactions.items());
    let debts = DebtTotals::of(store.debts.items());
    let goals = GoalTotals::of(store.goals.items());
    let net_position = finance
        .balance
        .checked_add(goals.current)
        .and_then(|n| n.checked_sub(debts.remaining))
        .context("net position out of range")?;

    Ok(DashboardStats {
        fleet: FleetSummary::of(store.vehicles.items()),
        rentals: RentalSummary::of(store.rentals.items()),
        finance,
        debts,
        goals,
        net_position,
    })
}

/// Everything that needs attention, most urgent first.
pub(crate) fn dashboard_alerts(store: &Store, today: NaiveDate) -> Result<Vec<Alert>> {
    let deadline_limit = today
        .checked_add_days(Days::new(DEADLINE_WINDOW_DAYS))
        .context("goal deadline window out of range")?;
    let mut alerts = Vec::new();
    let mut push = |severity, title: &str, detail: String, route| {
        alerts.push(Alert {
            severity,
            title: title.to_string(),
            detail,
            route,
        });
    };

    for v in store.vehicles.items() {
        match v.document_status {
            DocumentStatus::Expired => push(
                Severity::High,
                "Licensing expired",
                format!("{} has expired documents", v.display_name()),
                Route::Vehicles,
            ),
            DocumentStatus::Pending => push(
                Severity::Medium,
                "Licensing pending",
                format!("{} has pending documents", v.display_name()),
                Route::Vehicles,
            ),
            DocumentStatus::Regular => {}
        }
        if v.status != VehicleStatus::Inactive && v.maintenance_due(today, MAINTENANCE_WINDOW_DAYS) {
            push(
                Severity::Medium,
                "Maintenance due",
                format!("{} is due for service on {}", v.display_name(), format_date(v.next_maintenance)),
                Route::Vehicles,
            );
        }
    }

    for r in store.rentals.items().iter().filter(|r| r.status == RentalStatus::Pending) {
        push(
            Severity::Low,
            "Payment pending",
            format!("Rental #{} ({}) awaits payment", r.id, r.customer_name),
            Route::Rentals,
        );
    }

    for d in store.debts.items().iter().filter(|d| d.status == DebtStatus::Overdue) {
        push(
            Severity::High,
            "Debt overdue",
            format!("{}: {} outstanding", d.description, format_amount(d.remaining_amount)),
            Route::Debts,
        );
    }

    for g in store
        .goals
        .items()
        .iter()
        .filter(|g| g.status == GoalStatus::InProgress && g.deadline <= deadline_limit)
    {
        let detail = if g.deadline < today {
            format!("{} passed its deadline", g.title)
        } else {
            format!("{} is due on {}", g.title, format_date(g.deadline))
        };
        push(Severity::Medium, "Goal deadline", detail, Route::Goals);
    }

    alerts.sort_by_key(|a| a.severity);
    Ok(alerts)
}

/// Newest rentals first.
pub(crate) fn recent_rentals(store: &Store, limit: usize) -> Vec<Rental> {
    let mut rentals = store.rentals.items().to_vec();
    rentals.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
    rentals.truncate(limit);
    rentals
}
