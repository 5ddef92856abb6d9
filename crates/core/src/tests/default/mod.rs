mod test_protocol;
