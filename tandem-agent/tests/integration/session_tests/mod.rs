mod test_two_agents_over_relay;
