mod crisis_state_props;
mod stakeholder_props;
