mod wire_format;
